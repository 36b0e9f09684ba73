//! Access token claims
//!
//! Tokens are issued and verified by the GSB server. The client only reads
//! the claims it needs (expiry and tenant code), so signatures are not
//! checked here.

use gsb_core::GsbError;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims read from a GSB access token
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user name or id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Issued at (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Tenant code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc: Option<String>,
    /// Remaining claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Whether the token is expired at `now` (Unix seconds), allowing `leeway`
    ///
    /// Tokens without `exp` never expire.
    pub fn is_expired_at(&self, now: i64, leeway: i64) -> bool {
        self.exp.map(|exp| exp - leeway <= now).unwrap_or(false)
    }

    pub fn is_expired(&self, leeway: i64) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp(), leeway)
    }

    /// Tenant code, ignoring blank values
    pub fn tenant_code(&self) -> Option<&str> {
        self.tc.as_deref().filter(|tc| !tc.trim().is_empty())
    }
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Missing token")]
    Missing,
}

impl From<JwtError> for GsbError {
    fn from(e: JwtError) -> Self {
        GsbError::Unauthorized {
            message: e.to_string(),
        }
    }
}

/// Read the claims of a token without verifying its signature
pub fn decode_claims(token: &str) -> Result<TokenClaims, JwtError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(JwtError::Missing);
    }

    let header = jsonwebtoken::decode_header(token).map_err(|e| JwtError::Invalid(e.to_string()))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| JwtError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}

/// Authorization header value for a token
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}
