//! Session and token management.

pub mod claims;
pub mod manager;

pub use claims::{AccessClaims, RefreshClaims, SessionClaims, TokenPair, User};
pub use manager::TokenManager;
