//! Result type aliases

use crate::error::GsbError;

/// Standard Result type for GSB operations
pub type GsbResult<T> = Result<T, GsbError>;
