//! `tokengate-core`: primitives shared by the auth, users and api crates.
//!
//! This crate contains no IO and no HTTP concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
