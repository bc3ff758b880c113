use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::mailer::Mailer;
use crate::bootstrap::config::Config;

/// Transactional-mail relay client (Brevo-compatible `smtp/email` JSON API).
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    sender_email: String,
    sender_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody {
    sender: EmailAddress,
    to: Vec<EmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

impl HttpMailer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: cfg.mail_api_url.clone(),
            api_key: cfg.mail_api_key.clone(),
            sender_email: cfg.mail_sender_email.clone(),
            sender_name: cfg.mail_sender_name.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_verification(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        verification_url: &str,
    ) -> anyhow::Result<()> {
        let body = SendEmailBody {
            sender: EmailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![EmailAddress {
                email: to_email.to_string(),
                name: to_name.map(|s| s.to_string()),
            }],
            subject: "Verify Your Email Address".to_string(),
            html_content: format!(
                "<p>Please click the following link to verify your email address:</p>\
                 <a href=\"{verification_url}\">{verification_url}</a>"
            ),
            text_content: format!(
                "Please click the following link to verify your email address: {verification_url}"
            ),
        };

        let resp = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .header(http::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .context("mail relay request failed")?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(to = %to_email, "verification_email_sent");
            return Ok(());
        }

        let detail = resp.text().await.unwrap_or_default();
        anyhow::bail!("mail relay rejected message (status={status}): {detail}")
    }
}
