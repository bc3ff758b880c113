use async_trait::async_trait;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Writes one object and returns its public URL.
    async fn put_image(
        &self,
        key: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> anyhow::Result<String>;
}
