use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use thiserror::Error;

use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Email not found")]
    EmailNotFound,
    #[error("Password is wrong")]
    WrongPassword,
    #[error("Please verify your email before logging in")]
    Unverified,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> Result<UserRow, LoginError> {
        let row = self
            .repo
            .find_by_email(&req.email)
            .await?
            .ok_or(LoginError::EmailNotFound)?;

        let hash = row.password_hash.clone().unwrap_or_default();
        let parsed = PasswordHash::new(&hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(LoginError::WrongPassword);
        }

        if !row.is_verified {
            return Err(LoginError::Unverified);
        }

        Ok(UserRow {
            password_hash: None,
            ..row
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryUsers;

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_report_distinct_errors() {
        let repo = InMemoryUsers::default();
        repo.insert_verified("Verified User", "v@x.com", "password123");
        let uc = Login { repo: &repo };

        let err = uc.execute(&request("nobody@x.com", "password123")).await;
        assert!(matches!(err.unwrap_err(), LoginError::EmailNotFound));

        let err = uc.execute(&request("v@x.com", "wrong-password")).await;
        assert!(matches!(err.unwrap_err(), LoginError::WrongPassword));
    }

    #[tokio::test]
    async fn correct_credentials_fail_until_verified() {
        let repo = InMemoryUsers::default();
        repo.insert_unverified("Test User", "t@x.com", "dummy-token");
        let uc = Login { repo: &repo };

        let err = uc.execute(&request("t@x.com", "password123")).await;
        assert!(matches!(err.unwrap_err(), LoginError::Unverified));
    }

    #[tokio::test]
    async fn success_strips_the_password_hash() {
        let repo = InMemoryUsers::default();
        let user = repo.insert_verified("Verified User", "v@x.com", "password123");
        let uc = Login { repo: &repo };

        let row = uc.execute(&request("v@x.com", "password123")).await.unwrap();
        assert_eq!(row.id, user.id);
        assert!(row.password_hash.is_none());
    }
}
