pub mod get_user;
pub mod list_users;
