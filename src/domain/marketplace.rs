use uuid::Uuid;

/// Catalog entry. Seeded out-of-band, read-only from the API.
#[derive(Debug, Clone)]
pub struct Disc {
    pub id: Uuid,
    pub manufacturer: String,
    pub name: String,
    pub flight: FlightNumbers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightNumbers {
    pub speed: i32,
    pub glide: i32,
    pub turn: i32,
    pub fade: i32,
}

/// A marketplace listing. The disc is snapshotted at creation time so the
/// listing keeps rendering even if the catalog row changes later.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub disc: Disc,
    pub price: f64,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub user_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
