mod s3_image_store;
pub use s3_image_store::S3ImageStore;
