//! Middleware for the Stratos backend

pub mod auth;
pub mod security;
pub mod tracing;

pub use auth::{AdminUser, AuthenticatedUser, CollectorUser};
pub use security::security_headers;
pub use tracing::request_tracing;
