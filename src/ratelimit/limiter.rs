//! Core sliding-window rate limiter implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, trace};

use crate::config::RateLimitSettings;
use crate::error::{Result, WardenError};

use super::backend::RateLimitBackend;

/// A sliding-window-log rate limiter.
///
/// Every admitted attempt is recorded with its timestamp; on each check,
/// timestamps older than the window are pruned before the quota is
/// evaluated. This avoids the boundary burst artifacts of fixed-bucket
/// counters: the limit holds over *any* interval of the window's length,
/// not just aligned buckets.
///
/// This struct is thread-safe and can be shared across tasks. The
/// prune-check-append sequence for a key runs under that key's map entry
/// lock, so concurrent checks on the same key are serialized and cannot
/// both be admitted off stale state.
pub struct SlidingWindowLimiter {
    /// Recorded attempt times, indexed by caller key
    records: DashMap<String, Vec<Instant>>,
    /// Length of the sliding window
    window: Duration,
    /// Maximum admitted attempts per key within the window
    max_requests: usize,
}

impl SlidingWindowLimiter {
    /// Create a new limiter from configuration.
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            records: DashMap::new(),
            window: Duration::from_millis(settings.window_ms),
            max_requests: settings.max_requests as usize,
        }
    }

    /// Check whether the keyed actor may proceed.
    ///
    /// Returns `true` and records the attempt if the key is within quota.
    /// Returns `false` otherwise; a denied attempt records nothing, so
    /// denials never extend a key's penalty beyond what admitted attempts
    /// already imply. Total over any key and configuration; never errors.
    pub fn check_limit(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entry = self.records.entry(key.to_string()).or_default();

        // Prune attempts that have aged out of the window.
        entry.retain(|t| now.duration_since(*t) < self.window);

        if entry.len() >= self.max_requests {
            debug!(key = %key, count = entry.len(), "Rate limit exceeded");
            return false;
        }

        entry.push(now);
        trace!(key = %key, count = entry.len(), "Attempt admitted");
        true
    }

    /// Unconditionally clear the record for a key.
    ///
    /// Used for administrative override (e.g., after a password reset)
    /// and test setup. Clearing an unknown key is a no-op.
    pub fn reset_limit(&self, key: &str) {
        self.records.remove(key);
        debug!(key = %key, "Rate limit reset");
    }

    /// Check the limit, mapping a denial to an error.
    ///
    /// Convenience for request handlers that propagate `Result`.
    pub fn enforce(&self, key: &str) -> Result<()> {
        if self.check_limit(key) {
            Ok(())
        } else {
            Err(WardenError::RateLimited(key.to_string()))
        }
    }

    /// Drop records whose every timestamp has aged out of the window.
    ///
    /// The limiter does not self-expire keys it never sees again, so a
    /// periodic caller (or an operator) reclaims memory with this.
    pub fn sweep(&self) {
        let now = Instant::now();
        // Counted inside the closure: the map may grow concurrently, so a
        // before/after length difference is not a removal count.
        let mut swept = 0usize;
        self.records.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < self.window);
            if timestamps.is_empty() {
                swept += 1;
                false
            } else {
                true
            }
        });
        debug!(
            swept,
            remaining = self.records.len(),
            "Swept stale rate limit records"
        );
    }

    /// Get the number of keys currently tracked.
    pub fn key_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl RateLimitBackend for SlidingWindowLimiter {
    async fn check_limit(&self, key: &str) -> bool {
        SlidingWindowLimiter::check_limit(self, key)
    }

    async fn reset_limit(&self, key: &str) {
        SlidingWindowLimiter::reset_limit(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_ms: u64, max_requests: u32) -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(RateLimitSettings {
            window_ms,
            max_requests,
        })
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = limiter(60_000, 3);

        assert!(limiter.check_limit("login:1.2.3.4"));
        assert!(limiter.check_limit("login:1.2.3.4"));
        assert!(limiter.check_limit("login:1.2.3.4"));
        assert!(!limiter.check_limit("login:1.2.3.4"));
    }

    #[test]
    fn test_denied_attempts_consume_no_quota() {
        let limiter = limiter(100, 2);

        assert!(limiter.check_limit("k"));
        assert!(limiter.check_limit("k"));
        // Repeated denials record nothing further.
        for _ in 0..10 {
            assert!(!limiter.check_limit("k"));
        }

        // Once the two admitted attempts age out, the key recovers in a
        // single window despite the burst of denials.
        std::thread::sleep(Duration::from_millis(150));
        assert!(limiter.check_limit("k"));
    }

    #[test]
    fn test_window_slides() {
        let limiter = limiter(100, 1);

        assert!(limiter.check_limit("k"));
        assert!(!limiter.check_limit("k"));

        std::thread::sleep(Duration::from_millis(150));
        assert!(limiter.check_limit("k"));
    }

    #[test]
    fn test_reset_limit() {
        let limiter = limiter(60_000, 1);

        assert!(limiter.check_limit("k"));
        assert!(!limiter.check_limit("k"));

        limiter.reset_limit("k");
        assert!(limiter.check_limit("k"));
    }

    #[test]
    fn test_reset_unknown_key_is_noop() {
        let limiter = limiter(60_000, 1);
        limiter.reset_limit("never-seen");
        assert!(limiter.check_limit("never-seen"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(60_000, 1);

        assert!(limiter.check_limit("a"));
        assert!(!limiter.check_limit("a"));
        assert!(limiter.check_limit("b"));
    }

    #[test]
    fn test_zero_quota_denies_everything() {
        let limiter = limiter(60_000, 0);
        assert!(!limiter.check_limit("k"));
    }

    #[test]
    fn test_enforce_maps_denial_to_error() {
        let limiter = limiter(60_000, 1);

        assert!(limiter.enforce("k").is_ok());
        assert!(matches!(
            limiter.enforce("k"),
            Err(WardenError::RateLimited(key)) if key == "k"
        ));
    }

    #[test]
    fn test_sweep_reclaims_stale_keys() {
        let limiter = limiter(50, 5);

        limiter.check_limit("a");
        limiter.check_limit("b");
        assert_eq!(limiter.key_count(), 2);

        std::thread::sleep(Duration::from_millis(80));
        limiter.check_limit("c");
        limiter.sweep();

        assert_eq!(limiter.key_count(), 1);
    }

    #[test]
    fn test_sweep_concurrent_with_checks() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        // An enabled subscriber makes tracing evaluate the sweep log
        // fields, which is where a miscounted removal total would show up.
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(std::io::sink)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let limiter = Arc::new(limiter(10, 5));
        let stop = Arc::new(AtomicBool::new(false));

        let writer = {
            let limiter = Arc::clone(&limiter);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                let mut i = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    limiter.check_limit(&format!("key-{}", i));
                    i += 1;
                }
            })
        };

        // Keys age out of the 10ms window while the writer keeps adding
        // fresh ones, so sweeps interleave with concurrent growth.
        for _ in 0..200 {
            limiter.sweep();
        }

        stop.store(true, Ordering::Relaxed);
        writer.join().unwrap();
    }

    #[tokio::test]
    async fn test_backend_trait_object() {
        use std::sync::Arc;

        let backend: Arc<dyn RateLimitBackend> = Arc::new(limiter(60_000, 1));

        assert!(backend.check_limit("k").await);
        assert!(!backend.check_limit("k").await);
        backend.reset_limit("k").await;
        assert!(backend.check_limit("k").await);
    }

    #[test]
    fn test_concurrent_checks_respect_limit() {
        use std::sync::Arc;

        let limiter = Arc::new(limiter(60_000, 50));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(std::thread::spawn(move || {
                let mut admitted = 0u32;
                for _ in 0..25 {
                    if limiter.check_limit("shared") {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 50);
    }
}
