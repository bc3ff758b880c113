use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::application::use_cases::auth::login::LoginError;
use crate::application::use_cases::auth::register::RegisterError;
use crate::application::use_cases::images::upload_images::UploadImagesError;
use crate::application::use_cases::posts::create_post::CreatePostError;

/// Request-local error surface. Every variant renders as
/// `{"message": ...}` with the status the clients were built against.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    EmailExists,
    #[error("Email not found")]
    EmailNotFound,
    #[error("Password is wrong")]
    WrongPassword,
    #[error("Please verify your email before logging in")]
    Unverified,
    /// Verification-link token did not match any user.
    #[error("Invalid token")]
    InvalidVerificationToken,
    /// No bearer/refresh credential on a protected route.
    #[error("Access Denied")]
    AccessDenied,
    /// Credential present but failed signature or expiry checks.
    #[error("Invalid Token")]
    InvalidAuthToken,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Error sending verification email")]
    EmailDelivery,
    #[error("File upload error")]
    PayloadTooLarge,
    #[error("Error uploading files")]
    Upload,
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::EmailExists
            | ApiError::EmailNotFound
            | ApiError::WrongPassword
            | ApiError::Unverified
            | ApiError::InvalidVerificationToken
            | ApiError::InvalidAuthToken => StatusCode::BAD_REQUEST,
            ApiError::AccessDenied => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::EmailDelivery | ApiError::Upload | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            tracing::error!(error = ?err, "request_failed");
        }
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<RegisterError> for ApiError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::EmailExists => ApiError::EmailExists,
            RegisterError::EmailDelivery(e) => {
                tracing::error!(error = ?e, "verification_email_failed");
                ApiError::EmailDelivery
            }
            RegisterError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::EmailNotFound => ApiError::EmailNotFound,
            LoginError::WrongPassword => ApiError::WrongPassword,
            LoginError::Unverified => ApiError::Unverified,
            LoginError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl From<CreatePostError> for ApiError {
    fn from(err: CreatePostError) -> Self {
        match err {
            CreatePostError::DiscNotFound => ApiError::NotFound("Disc not found"),
            CreatePostError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl From<UploadImagesError> for ApiError {
    fn from(err: UploadImagesError) -> Self {
        match err {
            UploadImagesError::TooManyFiles | UploadImagesError::FileTooLarge => {
                ApiError::PayloadTooLarge
            }
            UploadImagesError::Store(_) => ApiError::Upload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn rendered(err: ApiError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, body["message"].as_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn renders_the_pinned_status_and_message_pairs() {
        let cases = [
            (
                ApiError::AccessDenied,
                StatusCode::UNAUTHORIZED,
                "Access Denied",
            ),
            (
                ApiError::InvalidAuthToken,
                StatusCode::BAD_REQUEST,
                "Invalid Token",
            ),
            (
                ApiError::InvalidVerificationToken,
                StatusCode::BAD_REQUEST,
                "Invalid token",
            ),
            (
                ApiError::EmailNotFound,
                StatusCode::BAD_REQUEST,
                "Email not found",
            ),
            (
                ApiError::WrongPassword,
                StatusCode::BAD_REQUEST,
                "Password is wrong",
            ),
            (
                ApiError::EmailExists,
                StatusCode::BAD_REQUEST,
                "Email already exists",
            ),
            (
                ApiError::NotFound("Post not found"),
                StatusCode::NOT_FOUND,
                "Post not found",
            ),
            (
                ApiError::PayloadTooLarge,
                StatusCode::PAYLOAD_TOO_LARGE,
                "File upload error",
            ),
        ];
        for (err, status, message) in cases {
            let (got_status, got_message) = rendered(err).await;
            assert_eq!(got_status, status);
            assert_eq!(got_message, message);
        }
    }
}
