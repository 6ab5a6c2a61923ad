pub mod auth;
pub mod cache;
pub mod password;
pub mod time;
