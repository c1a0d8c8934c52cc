//! Rate limiter trait for abstracting local and shared-store implementations.

use async_trait::async_trait;

/// Trait for rate limiter implementations.
///
/// The in-process `SlidingWindowLimiter` covers single-instance
/// deployments. A multi-instance deployment needs limiter state in a
/// shared external store (an atomic increment/expire primitive); this
/// trait is the seam where such an implementation plugs in without
/// touching the calling request layer.
#[async_trait]
pub trait RateLimitBackend: Send + Sync {
    /// Check whether the keyed actor may proceed, recording the attempt
    /// if admitted.
    async fn check_limit(&self, key: &str) -> bool;

    /// Unconditionally clear the record for a key.
    async fn reset_limit(&self, key: &str);
}
