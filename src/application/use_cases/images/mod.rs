pub mod upload_images;
