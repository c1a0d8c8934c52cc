//! Configuration management for Warden.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WardenError};

/// Main configuration for the Warden core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// Token and session configuration
    #[serde(default)]
    pub token: TokenSettings,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitSettings::default(),
            token: TokenSettings::default(),
        }
    }
}

/// Rate limiting configuration.
///
/// Limits are deployment-scoped: one window and one quota shared by every
/// key, not configurable per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Length of the sliding window in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Maximum requests allowed per key within the window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_requests() -> u32 {
    100
}

/// Token and session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Signing secret, loaded once at process start. Rotation is not
    /// supported; changing it invalidates every outstanding token.
    #[serde(default)]
    pub secret: String,

    /// Lifetime of session tokens and their store entries, in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// Lifetime of stateless access tokens, in seconds
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: u64,

    /// Lifetime of refresh tokens, in seconds
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: u64,

    /// Upper bound on any single store operation, in milliseconds.
    /// Exceeding it fails the verification closed.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            session_ttl_secs: default_session_ttl(),
            access_ttl_secs: default_access_ttl(),
            refresh_ttl_secs: default_refresh_ttl(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

fn default_session_ttl() -> u64 {
    86_400
}

fn default_access_ttl() -> u64 {
    900
}

fn default_refresh_ttl() -> u64 {
    604_800
}

fn default_store_timeout_ms() -> u64 {
    2_000
}

impl WardenConfig {
    /// Load configuration from a YAML file path.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| WardenError::Config(format!("Failed to parse config: {}", e)))
    }
}
