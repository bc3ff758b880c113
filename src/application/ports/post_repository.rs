use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::marketplace::{Disc, Post};

/// Everything needed to persist a listing. The disc is the resolved catalog
/// row; the repository stores it denormalized alongside the reference.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub disc: Disc,
    pub price: f64,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub user_id: Uuid,
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, new_post: &NewPost) -> anyhow::Result<Post>;
    /// All posts, newest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Post>>;
    /// Posts owned by one user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Post>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>>;
}
