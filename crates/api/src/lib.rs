//! HTTP API: configuration, routing, and the request-side auth plumbing.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
