//! Token issuance, verification, and revocation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::TokenSettings;
use crate::error::{Result, WardenError};
use crate::store::{RefreshTokenRecord, RefreshTokenStore, SessionStore, StoreError};

use super::claims::{AccessClaims, RefreshClaims, SessionClaims, TokenPair, User};

/// Mints, verifies, and revokes signed credentials.
///
/// One instance per process, constructed explicitly at startup and shared
/// behind an `Arc`. The manager owns the signing secret; the session store
/// is the single source of truth for revocation.
///
/// Two issuance paths share the one secret:
///
/// - [`generate_token`](Self::generate_token) mints a session token whose
///   verification requires a live session-store entry, making it revocable
///   at any moment.
/// - [`generate_tokens`](Self::generate_tokens) mints the login token
///   pair: a short-lived access token verified by signature alone (no
///   store round-trip on the per-request hot path) and a long-lived
///   refresh token persisted, hashed, in the durable refresh store.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_ttl: Duration,
    access_ttl: Duration,
    refresh_ttl: Duration,
    store_timeout: Duration,
    sessions: Arc<dyn SessionStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl TokenManager {
    /// Create a new token manager.
    ///
    /// Fails with a configuration error if the signing secret is empty.
    pub fn new(
        settings: TokenSettings,
        sessions: Arc<dyn SessionStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Result<Self> {
        if settings.secret.is_empty() {
            return Err(WardenError::Config(
                "Token signing secret must not be empty".to_string(),
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            session_ttl: Duration::from_secs(settings.session_ttl_secs),
            access_ttl: Duration::from_secs(settings.access_ttl_secs),
            refresh_ttl: Duration::from_secs(settings.refresh_ttl_secs),
            store_timeout: Duration::from_millis(settings.store_timeout_ms),
            sessions,
            refresh_tokens,
        })
    }

    /// Issue a session token for a user.
    ///
    /// Mints a fresh session ID, signs a token embedding it, and records
    /// the session in the store with a TTL equal to the token lifetime.
    /// Both derive from the same configured duration and the store write
    /// completes before the token is returned, so a token can never
    /// outlive its session entry. The reverse (an entry outliving a
    /// failed issuance) is harmless.
    pub async fn generate_token(&self, user_id: &str) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            sid: session_id.clone(),
            iat: now,
            exp: now + self.session_ttl.as_secs() as i64,
        };

        let token = self.encode_claims(&claims)?;
        self.store_call(self.sessions.set(&session_id, user_id, self.session_ttl))
            .await?;

        debug!(user_id = %user_id, session_id = %session_id, "Issued session token");
        Ok(token)
    }

    /// Verify a session token.
    ///
    /// Signature and expiry are checked first; only then is the embedded
    /// session ID resolved against the store. An absent entry means the
    /// session was revoked or store-expired, which callers cannot and
    /// need not distinguish.
    pub async fn verify_token(&self, token: &str) -> Result<SessionClaims> {
        let claims: SessionClaims = self.decode_claims(token)?;

        let found = self.store_call(self.sessions.get(&claims.sid)).await?;
        match found {
            Some(_) => Ok(claims),
            None => {
                debug!(session_id = %claims.sid, "Session absent from store");
                Err(WardenError::InvalidSession)
            }
        }
    }

    /// Invalidate a session by ID.
    ///
    /// Deletes the store entry; every subsequent verification of tokens
    /// bound to this session fails. Idempotent.
    pub async fn invalidate_token(&self, session_id: &str) -> Result<()> {
        self.store_call(self.sessions.delete(session_id)).await?;
        debug!(session_id = %session_id, "Session invalidated");
        Ok(())
    }

    /// Issue the login token pair for a user.
    ///
    /// The refresh token is persisted as a SHA-256 hash with an expiry
    /// matching its embedded lifetime; the raw value exists only in the
    /// returned pair.
    pub async fn generate_tokens(&self, user: &User) -> Result<TokenPair> {
        let now = Utc::now();
        let iat = now.timestamp();

        let access_claims = AccessClaims {
            sub: user.id.clone(),
            role: user.role.clone(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat + self.access_ttl.as_secs() as i64,
        };
        let access_token = self.encode_claims(&access_claims)?;

        let refresh_claims = RefreshClaims {
            sub: user.id.clone(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat + self.refresh_ttl.as_secs() as i64,
        };
        let refresh_token = self.encode_claims(&refresh_claims)?;

        let record = RefreshTokenRecord {
            token_hash: hash_token(&refresh_token),
            user_id: user.id.clone(),
            expires_at: now + ChronoDuration::seconds(self.refresh_ttl.as_secs() as i64),
        };
        self.store_call(self.refresh_tokens.insert(record)).await?;

        debug!(user_id = %user.id, "Issued token pair");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify a stateless access token.
    ///
    /// Signature and expiry only; no store round-trip. This is the
    /// per-request hot path.
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        self.decode_claims(token)
    }

    /// Verify a refresh token.
    ///
    /// Signature and expiry first, then the token's hash must resolve to
    /// a live record in the refresh store.
    pub async fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        let claims: RefreshClaims = self.decode_claims(token)?;

        let found = self
            .store_call(self.refresh_tokens.find(&hash_token(token)))
            .await?;
        match found {
            Some(_) => Ok(claims),
            None => {
                debug!(jti = %claims.jti, "Refresh token absent from store");
                Err(WardenError::InvalidSession)
            }
        }
    }

    /// Revoke a refresh token. Idempotent.
    pub async fn revoke_refresh_token(&self, token: &str) -> Result<()> {
        self.store_call(self.refresh_tokens.remove(&hash_token(token)))
            .await?;
        debug!("Refresh token revoked");
        Ok(())
    }

    fn encode_claims<T: Serialize>(&self, claims: &T) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| WardenError::Encoding(e.to_string()))
    }

    fn decode_claims<T: DeserializeOwned>(&self, token: &str) -> Result<T> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        match decode::<T>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => WardenError::Expired,
                // Malformed tokens and wrong-secret signatures are
                // indistinguishable to callers: both fail closed.
                _ => WardenError::InvalidSignature,
            }),
        }
    }

    /// Run a store operation under the configured timeout.
    ///
    /// A timeout or backend error fails the current operation closed;
    /// infrastructure trouble must never grant access.
    async fn store_call<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match timeout(self.store_timeout, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(error = %e, "Store operation failed");
                Err(WardenError::StoreUnavailable(e.to_string()))
            }
            Err(_) => {
                warn!(timeout_ms = self.store_timeout.as_millis() as u64, "Store operation timed out");
                Err(WardenError::StoreUnavailable(
                    "operation timed out".to_string(),
                ))
            }
        }
    }
}

/// SHA-256 hex digest of a token value, the refresh store key.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
