//! API handlers for the Stratos backend

pub mod auth;
pub mod borrowers;
pub mod collectors;
pub mod exports;
pub mod loans;
pub mod payments;
pub mod plans;
pub mod reports;
pub mod vault;

pub use auth::*;
pub use borrowers::*;
pub use collectors::*;
pub use exports::*;
pub use loans::*;
pub use payments::*;
pub use plans::*;
pub use reports::*;
pub use vault::*;

// Re-export auth extractors from middleware for handler use
pub use crate::middleware::auth::{AdminUser, AuthenticatedUser, CollectorUser};
