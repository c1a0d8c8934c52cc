//! Collaborator store contracts.
//!
//! The token manager talks to two external stores: a TTL key-value store
//! tracking live sessions, and a durable store holding issued refresh
//! tokens. Both are consumed through traits so production deployments can
//! back them with a shared store while tests and single-instance
//! deployments use the in-memory implementations in [`memory`].
//!
//! Implementations must keep per-key operations atomic; no multi-key
//! transactions are required. Raw token values must never be persisted or
//! logged; the refresh store only ever sees token hashes.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::{MemoryRefreshTokenStore, MemorySessionStore};

/// Errors surfaced by store implementations.
///
/// The token manager maps any store error (or a timed-out call) to
/// `WardenError::StoreUnavailable`, failing the verification closed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store failed or rejected the operation
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Key-value store with per-key TTL, tracking live sessions.
///
/// A session is live iff its key is present; expiry is enforced by the
/// store itself, so deletion and natural expiry are indistinguishable to
/// readers. That is the whole revocation mechanism: no blacklist.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Write a key with a value and TTL, replacing any existing entry.
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: std::time::Duration,
    ) -> std::result::Result<(), StoreError>;

    /// Read a key. Returns `None` for absent or expired entries.
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;

    /// Delete a key. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> std::result::Result<(), StoreError>;
}

/// A persisted refresh token, stored by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    /// SHA-256 hex digest of the token value
    pub token_hash: String,
    /// Owning principal
    pub user_id: String,
    /// Absolute expiry; the store may reap rows past this independently
    pub expires_at: DateTime<Utc>,
}

/// Durable store for issued refresh tokens.
///
/// Keyed by token hash so a leaked store dump yields no usable
/// credentials. Supports rotation and revocation independent of the
/// session store.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a newly issued token record.
    async fn insert(&self, record: RefreshTokenRecord) -> std::result::Result<(), StoreError>;

    /// Look up a record by token hash. Returns `None` for absent or
    /// expired records.
    async fn find(
        &self,
        token_hash: &str,
    ) -> std::result::Result<Option<RefreshTokenRecord>, StoreError>;

    /// Remove a record by token hash. Removing an absent hash is a no-op.
    async fn remove(&self, token_hash: &str) -> std::result::Result<(), StoreError>;
}
