use uuid::Uuid;

use crate::application::ports::post_repository::PostRepository;
use crate::domain::marketplace::Post;

pub struct ListPosts<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> ListPosts<'a, R> {
    /// Newest first. An empty result is an empty list, not an error.
    pub async fn execute(&self, owner: Option<Uuid>) -> anyhow::Result<Vec<Post>> {
        match owner {
            Some(user_id) => self.repo.list_by_user(user_id).await,
            None => self.repo.list_all().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryDiscs, InMemoryPosts};
    use crate::application::use_cases::posts::create_post::{CreatePost, CreatePostInput};
    use crate::domain::marketplace::FlightNumbers;

    #[tokio::test]
    async fn filters_by_owner_and_sorts_newest_first() {
        let posts = InMemoryPosts::default();
        let discs = InMemoryDiscs::default();
        let disc = discs.insert(
            "Discraft",
            "Buzzz",
            FlightNumbers {
                speed: 5,
                glide: 4,
                turn: -1,
                fade: 1,
            },
        );
        let create = CreatePost {
            posts: &posts,
            discs: &discs,
        };
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        for (user_id, title) in [(alice, "first"), (bob, "second"), (alice, "third")] {
            create
                .execute(CreatePostInput {
                    title: title.into(),
                    disc_id: disc.id,
                    price: 10.0,
                    description: None,
                    images: vec![],
                    user_id,
                })
                .await
                .unwrap();
        }

        let uc = ListPosts { repo: &posts };
        let all = uc.execute(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let mine = uc.execute(Some(alice)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p.user_id == alice));

        let none = uc.execute(Some(Uuid::new_v4())).await.unwrap();
        assert!(none.is_empty());
    }
}
