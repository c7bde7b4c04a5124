//! `tokengate-users`: user records and the repository capability that stores them.
//!
//! The repository is injected into whatever composes the HTTP handlers; there is
//! no process-global user table.

pub mod repository;
pub mod user;

pub use repository::{InMemoryUserRepository, UserRepository};
pub use user::{NewUser, ReplaceUser, User, UserPatch};
