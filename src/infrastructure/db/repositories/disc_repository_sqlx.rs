use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::disc_repository::DiscRepository;
use crate::domain::marketplace::{Disc, FlightNumbers};
use crate::infrastructure::db::PgPool;

pub struct SqlxDiscRepository {
    pub pool: PgPool,
}

impl SqlxDiscRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_disc(r: &sqlx::postgres::PgRow) -> Disc {
    Disc {
        id: r.get("id"),
        manufacturer: r.get("manufacturer"),
        name: r.get("name"),
        flight: FlightNumbers {
            speed: r.get("speed"),
            glide: r.get("glide"),
            turn: r.get("turn"),
            fade: r.get("fade"),
        },
    }
}

#[async_trait]
impl DiscRepository for SqlxDiscRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Disc>> {
        let row = sqlx::query(
            r#"SELECT id, manufacturer, name, speed, glide, turn, fade
               FROM discs WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_disc))
    }

    async fn list_discs(&self) -> anyhow::Result<Vec<Disc>> {
        let rows = sqlx::query(
            r#"SELECT id, manufacturer, name, speed, glide, turn, fade
               FROM discs ORDER BY manufacturer, name"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_disc).collect())
    }
}
