pub mod auth;
pub mod discs;
pub mod error;
pub mod health;
pub mod posts;
pub mod users;
