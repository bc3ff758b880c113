use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;
use rand::RngCore;
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::mailer::Mailer;
use crate::application::ports::user_repository::UserRepository;

pub struct Register<'a, R, M>
where
    R: UserRepository + ?Sized,
    M: Mailer + ?Sized,
{
    pub repo: &'a R,
    pub mailer: &'a M,
    /// Origin the verification link points at, e.g. `https://app.example.com`.
    pub verification_base_url: &'a str,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Email already exists")]
    EmailExists,
    #[error("Error sending verification email")]
    EmailDelivery(#[source] anyhow::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl<'a, R, M> Register<'a, R, M>
where
    R: UserRepository + ?Sized,
    M: Mailer + ?Sized,
{
    /// Order matters: the verification email goes out before the row is
    /// written, so a mail failure leaves no half-registered user behind.
    pub async fn execute(&self, req: &RegisterRequest) -> Result<Uuid, RegisterError> {
        if self.repo.find_by_email(&req.email).await?.is_some() {
            return Err(RegisterError::EmailExists);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();

        let token = generate_verification_token();
        let url = format!(
            "{}/verify/{}",
            self.verification_base_url.trim_end_matches('/'),
            token
        );
        self.mailer
            .send_verification(&req.email, Some(&req.name), &url)
            .await
            .map_err(RegisterError::EmailDelivery)?;

        let user = self
            .repo
            .create_user(&req.name, &req.email, &hash, &token)
            .await?;
        Ok(user.id)
    }
}

fn generate_verification_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeMailer, InMemoryUsers};

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Test User".into(),
            email: "t@x.com".into(),
            password: "password123".into(),
        }
    }

    #[tokio::test]
    async fn registers_unverified_user_and_sends_link() {
        let repo = InMemoryUsers::default();
        let mailer = FakeMailer::default();
        let uc = Register {
            repo: &repo,
            mailer: &mailer,
            verification_base_url: "http://localhost:3000",
        };

        let id = uc.execute(&request()).await.unwrap();

        let user = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(!user.is_verified);
        assert_ne!(user.password_hash.as_deref(), Some("password123"));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].url.starts_with("http://localhost:3000/verify/"));
        let token = sent[0].url.rsplit('/').next().unwrap().to_string();
        assert_eq!(token.len(), 64);
        assert!(
            repo.find_by_verification_token(&token)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_regardless_of_password() {
        let repo = InMemoryUsers::default();
        let mailer = FakeMailer::default();
        let uc = Register {
            repo: &repo,
            mailer: &mailer,
            verification_base_url: "http://localhost:3000",
        };
        uc.execute(&request()).await.unwrap();

        let mut again = request();
        again.password = "another-valid-password".into();
        let err = uc.execute(&again).await.unwrap_err();
        assert!(matches!(err, RegisterError::EmailExists));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn mail_failure_persists_nothing() {
        let repo = InMemoryUsers::default();
        let mailer = FakeMailer::failing();
        let uc = Register {
            repo: &repo,
            mailer: &mailer,
            verification_base_url: "http://localhost:3000",
        };

        let err = uc.execute(&request()).await.unwrap_err();
        assert!(matches!(err, RegisterError::EmailDelivery(_)));
        assert!(repo.find_by_email("t@x.com").await.unwrap().is_none());
    }
}
