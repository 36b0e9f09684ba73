//! Tenant resolution
//!
//! Every request names the tenant it acts for. An explicitly configured code
//! wins; otherwise the `tc` claim of the current token is used.

use crate::jwt::TokenClaims;

/// Header carrying the tenant code
pub const TENANT_HEADER: &str = "X-Tenant-Code";

/// Pick the tenant code for a request
pub fn resolve_tenant_code(configured: Option<&str>, claims: Option<&TokenClaims>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|tc| !tc.is_empty())
        .or_else(|| claims.and_then(|c| c.tenant_code()))
        .map(str::to_string)
}
