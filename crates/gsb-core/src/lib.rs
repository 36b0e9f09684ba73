//! # gsb-core
//!
//! Core types, errors, and configuration for GSB RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - The common error type and validation error collection
//! - Result type alias
//! - Identifier traits
//! - Page window used by queries and grids
//! - Client configuration

pub mod error;
pub mod result;
pub mod traits;
pub mod pagination;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
pub use pagination::*;
