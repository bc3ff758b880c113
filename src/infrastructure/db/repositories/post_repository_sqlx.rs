use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::post_repository::{NewPost, PostRepository};
use crate::domain::marketplace::{Disc, FlightNumbers, Post};
use crate::infrastructure::db::PgPool;

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = r#"id, title, disc_id, disc_manufacturer, disc_name,
    disc_speed, disc_glide, disc_turn, disc_fade,
    price, description, images, user_id, created_at"#;

fn row_to_post(r: &sqlx::postgres::PgRow) -> Post {
    Post {
        id: r.get("id"),
        title: r.get("title"),
        disc: Disc {
            id: r.get("disc_id"),
            manufacturer: r.get("disc_manufacturer"),
            name: r.get("disc_name"),
            flight: FlightNumbers {
                speed: r.get("disc_speed"),
                glide: r.get("disc_glide"),
                turn: r.get("disc_turn"),
                fade: r.get("disc_fade"),
            },
        },
        price: r.get("price"),
        description: r.try_get("description").ok(),
        images: r.get("images"),
        user_id: r.get("user_id"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create_post(&self, new_post: &NewPost) -> anyhow::Result<Post> {
        let sql = format!(
            r#"INSERT INTO posts (title, disc_id, disc_manufacturer, disc_name,
                   disc_speed, disc_glide, disc_turn, disc_fade,
                   price, description, images, user_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING {POST_COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(&new_post.title)
            .bind(new_post.disc.id)
            .bind(&new_post.disc.manufacturer)
            .bind(&new_post.disc.name)
            .bind(new_post.disc.flight.speed)
            .bind(new_post.disc.flight.glide)
            .bind(new_post.disc.flight.turn)
            .bind(new_post.disc.flight.fade)
            .bind(new_post.price)
            .bind(new_post.description.as_deref())
            .bind(&new_post.images)
            .bind(new_post.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row_to_post(&row))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Post>> {
        let sql =
            format!("SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 ORDER BY created_at DESC");
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_post))
    }
}
