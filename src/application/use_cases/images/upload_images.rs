use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::image_store::ImageStore;

/// All listing images land under one bucket prefix.
const KEY_PREFIX: &str = "posts";

pub struct UploadImages<'a, S: ImageStore + ?Sized> {
    pub store: &'a S,
    pub max_files: usize,
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum UploadImagesError {
    #[error("File upload error")]
    TooManyFiles,
    #[error("File upload error")]
    FileTooLarge,
    #[error("Error uploading files")]
    Store(#[source] anyhow::Error),
}

impl<'a, S: ImageStore + ?Sized> UploadImages<'a, S> {
    /// Uploads sequentially and returns the public URLs in input order.
    /// A mid-batch failure aborts without deleting already-written objects.
    pub async fn execute(&self, files: Vec<ImageUpload>) -> Result<Vec<String>, UploadImagesError> {
        if files.len() > self.max_files {
            return Err(UploadImagesError::TooManyFiles);
        }
        if files.iter().any(|f| f.bytes.len() > self.max_bytes) {
            return Err(UploadImagesError::FileTooLarge);
        }

        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let key = format!("{}/{}-{}", KEY_PREFIX, Uuid::new_v4(), file.filename);
            let url = self
                .store
                .put_image(&key, file.content_type.as_deref(), file.bytes)
                .await
                .map_err(|err| {
                    tracing::error!(error = ?err, %key, "image_upload_failed");
                    UploadImagesError::Store(err)
                })?;
            urls.push(url);
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeImageStore;

    fn image(name: &str, size: usize) -> ImageUpload {
        ImageUpload {
            filename: name.into(),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0u8; size],
        }
    }

    fn uc(store: &FakeImageStore) -> UploadImages<'_, FakeImageStore> {
        UploadImages {
            store,
            max_files: 5,
            max_bytes: 10 * 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn enforces_file_count_and_size_limits() {
        let store = FakeImageStore::default();
        let too_many: Vec<_> = (0..6).map(|i| image(&format!("{i}.jpg"), 10)).collect();
        let err = uc(&store).execute(too_many).await.unwrap_err();
        assert!(matches!(err, UploadImagesError::TooManyFiles));

        let err = uc(&store)
            .execute(vec![image("big.jpg", 10 * 1024 * 1024 + 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadImagesError::FileTooLarge));

        // Limit checks happen before any object write.
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn returns_urls_in_input_order_under_posts_prefix() {
        let store = FakeImageStore::default();
        let urls = uc(&store)
            .execute(vec![image("front.jpg", 10), image("back.jpg", 10)])
            .await
            .unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].contains("posts/") && urls[0].ends_with("-front.jpg"));
        assert!(urls[1].contains("posts/") && urls[1].ends_with("-back.jpg"));
    }

    #[tokio::test]
    async fn mid_batch_failure_leaves_earlier_objects_in_place() {
        let store = FakeImageStore::failing_after(1);
        let err = uc(&store)
            .execute(vec![image("front.jpg", 10), image("back.jpg", 10)])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadImagesError::Store(_)));
        // The first object was written and is not rolled back.
        assert_eq!(store.keys().len(), 1);
    }
}
