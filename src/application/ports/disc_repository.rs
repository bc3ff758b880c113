use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::marketplace::Disc;

#[async_trait]
pub trait DiscRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Disc>>;
    async fn list_discs(&self) -> anyhow::Result<Vec<Disc>>;
}
