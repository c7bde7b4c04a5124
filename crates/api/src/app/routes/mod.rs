pub mod auth;
pub mod protected;
pub mod system;
pub mod users;
