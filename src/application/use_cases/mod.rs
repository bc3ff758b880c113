pub mod auth;
pub mod discs;
pub mod images;
pub mod posts;
pub mod users;
