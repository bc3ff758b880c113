pub mod disc_repository_sqlx;
pub mod post_repository_sqlx;
pub mod user_repository_sqlx;
