use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers the verification link to a freshly registered address.
    /// Registration aborts (and persists nothing) if this fails.
    async fn send_verification(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        verification_url: &str,
    ) -> anyhow::Result<()>;
}
