//! Token claim types.
//!
//! Three claim shapes cover the two issuance paths: session tokens carry a
//! store-backed session reference, access tokens are self-contained for
//! hot-path checks, and refresh tokens carry an identifier matched against
//! the durable refresh store.

use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// Verification is stateful: the embedded `sid` must resolve to a live
/// entry in the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Owning principal (user ID)
    pub sub: String,
    /// Session identifier, the store lookup key
    pub sid: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Claims carried by a stateless access token.
///
/// Verified by signature and expiry alone; no store round-trip, which is
/// why revoking a session does not cut short already-issued access tokens
/// within their short lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Owning principal (user ID)
    pub sub: String,
    /// Role granted to the principal
    pub role: String,
    /// Unique token identifier
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Claims carried by a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    /// Owning principal (user ID)
    pub sub: String,
    /// Unique token identifier
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// The credential pair returned by the login flow.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    /// Short-lived stateless credential
    pub access_token: String,
    /// Long-lived revocable credential
    pub refresh_token: String,
}

/// Principal identity as provided by the credential-lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier
    pub id: String,
    /// Role granted to the user
    pub role: String,
}
