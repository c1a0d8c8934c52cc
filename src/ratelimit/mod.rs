//! Rate limiting components.

pub mod backend;
pub mod limiter;

pub use backend::RateLimitBackend;
pub use limiter::SlidingWindowLimiter;
