use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        verification_token: &str,
    ) -> anyhow::Result<UserRow>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_verification_token(&self, token: &str) -> anyhow::Result<Option<UserRow>>;
    /// Sets the verified flag and clears the verification token.
    async fn mark_verified(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn list_users(&self) -> anyhow::Result<Vec<UserRow>>;
}
