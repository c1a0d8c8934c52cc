//! Error types for the Warden core.

use thiserror::Error;

/// Main error type for Warden operations.
///
/// Every verification failure is terminal for the current attempt; nothing
/// here is retried internally. The rate limiter itself signals denial
/// through its boolean return value and only surfaces `RateLimited` via
/// the `enforce` convenience wrapper.
#[derive(Error, Debug)]
pub enum WardenError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Quota exceeded for a key; retryable after the window elapses
    #[error("Too many requests for key: {0}")]
    RateLimited(String),

    /// Token tampered with or signed with the wrong secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token past its validity window; caller must re-authenticate
    #[error("Token expired")]
    Expired,

    /// Token could not be signed
    #[error("Token encoding error: {0}")]
    Encoding(String),

    /// Session missing from the store (revoked or store-expired)
    #[error("Session not found or revoked")]
    InvalidSession,

    /// External store timeout or failure; verification fails closed
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Warden operations.
pub type Result<T> = std::result::Result<T, WardenError>;
