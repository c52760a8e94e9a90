//! Authentication for the Stratos backend
//!
//! Email/password login with JWT access and refresh tokens. Sessions are
//! tracked by jti so issued tokens can be revoked.

pub mod jwt;
pub mod service;

pub use jwt::{generate_access_token, generate_refresh_token, verify_token, Claims};
pub use service::{AuthError, AuthService};
