use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::disc_repository::DiscRepository;
use crate::application::ports::post_repository::{NewPost, PostRepository};
use crate::domain::marketplace::Post;

pub struct CreatePost<'a, P, D>
where
    P: PostRepository + ?Sized,
    D: DiscRepository + ?Sized,
{
    pub posts: &'a P,
    pub discs: &'a D,
}

#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub title: String,
    pub disc_id: Uuid,
    pub price: f64,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub user_id: Uuid,
}

#[derive(Debug, Error)]
pub enum CreatePostError {
    #[error("Disc not found")]
    DiscNotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl<'a, P, D> CreatePost<'a, P, D>
where
    P: PostRepository + ?Sized,
    D: DiscRepository + ?Sized,
{
    pub async fn execute(&self, input: CreatePostInput) -> Result<Post, CreatePostError> {
        let disc = self
            .discs
            .find_by_id(input.disc_id)
            .await?
            .ok_or(CreatePostError::DiscNotFound)?;

        let post = self
            .posts
            .create_post(&NewPost {
                title: input.title,
                disc,
                price: input.price,
                description: input.description,
                images: input.images,
                user_id: input.user_id,
            })
            .await?;
        Ok(post)
    }
}
