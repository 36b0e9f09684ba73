//! In-memory token session
//!
//! Holds the access token a client obtained, with its decoded claims. The
//! store is shared by cloned clients; a token close to expiry reads as absent
//! so the next request fetches a fresh one.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::jwt::{decode_claims, JwtError, TokenClaims};

/// Seconds before `exp` at which a token is treated as expired
pub const EXPIRY_LEEWAY_SECONDS: i64 = 30;

/// An access token and what it says about itself
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub claims: TokenClaims,
    pub obtained_at: DateTime<Utc>,
}

impl AuthSession {
    /// Decode a freshly issued token
    pub fn new(token: impl Into<String>) -> Result<Self, JwtError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Self {
            token,
            claims,
            obtained_at: Utc::now(),
        })
    }

    pub fn is_usable(&self) -> bool {
        !self.claims.is_expired(EXPIRY_LEEWAY_SECONDS)
    }

    pub fn tenant_code(&self) -> Option<&str> {
        self.claims.tenant_code()
    }
}

/// Thread-safe holder for the current session
#[derive(Debug, Default)]
pub struct TokenStore {
    session: RwLock<Option<AuthSession>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a pre-issued token
    pub fn with_token(token: &str) -> Result<Self, JwtError> {
        let store = Self::new();
        store.set(token)?;
        Ok(store)
    }

    // A panic while holding the lock cannot leave the Option half-written
    fn read(&self) -> RwLockReadGuard<'_, Option<AuthSession>> {
        self.session.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<AuthSession>> {
        self.session.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current session, unless it is missing or about to expire
    pub fn current(&self) -> Option<AuthSession> {
        self.read().as_ref().filter(|s| s.is_usable()).cloned()
    }

    /// Replace the session with a new token
    pub fn set(&self, token: &str) -> Result<AuthSession, JwtError> {
        let session = AuthSession::new(token)?;
        *self.write() = Some(session.clone());
        debug!(subject = ?session.claims.sub, "Stored access token");
        Ok(session)
    }

    /// Forget the session, returning whether one was held
    pub fn clear(&self) -> bool {
        self.write().take().is_some()
    }

    /// Forget the session only if it still holds `token`
    ///
    /// A token refreshed by another task in the meantime is kept.
    pub fn clear_token(&self, token: &str) -> bool {
        let mut guard = self.write();
        if guard.as_ref().is_some_and(|s| s.token == token) {
            guard.take();
            true
        } else {
            false
        }
    }
}
