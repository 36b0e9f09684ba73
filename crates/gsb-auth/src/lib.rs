//! # gsb-auth
//!
//! Client-side authentication for GSB RS.
//!
//! ## Features
//!
//! - Access token claim decoding
//! - In-memory token session
//! - Tenant code resolution

pub mod jwt;
pub mod session;
pub mod tenant;

pub use jwt::{bearer_header, decode_claims, JwtError, TokenClaims};
pub use session::{AuthSession, TokenStore, EXPIRY_LEEWAY_SECONDS};
pub use tenant::{resolve_tenant_code, TENANT_HEADER};
