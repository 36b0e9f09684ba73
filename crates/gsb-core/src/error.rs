//! Core error types for GSB RS
//!
//! Every failure a client can observe ends up here: transport problems,
//! non-success API responses, local naming rules and configuration issues.

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all GSB client operations
#[derive(Error, Debug)]
pub enum GsbError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation errors collection keyed by field name
#[derive(Error, Debug, Default, Clone)]
#[error("Validation errors: {errors:?}")]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// Turn a non-empty collection into an error
    pub fn into_result(self) -> Result<(), GsbError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(GsbError::Validation(self))
        }
    }
}

impl GsbError {
    pub fn not_found(entity: impl Into<String>, field: &'static str, value: impl Into<String>) -> Self {
        GsbError::NotFound {
            entity: entity.into(),
            field,
            value: value.into(),
        }
    }

    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        GsbError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Map an HTTP status and server message to the closest error variant
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => GsbError::Unauthorized { message },
            403 => GsbError::Forbidden { message },
            _ => GsbError::Api { status, message },
        }
    }

    /// HTTP-like status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            GsbError::NotFound { .. } => 404,
            GsbError::Unauthorized { .. } => 401,
            GsbError::Forbidden { .. } => 403,
            GsbError::InvalidName { .. } | GsbError::Validation(_) => 422,
            GsbError::Api { status, .. } => *status,
            GsbError::Transport(_) => 503,
            GsbError::Serialization(_) | GsbError::Config(_) | GsbError::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GsbError::NotFound { .. } => "not_found",
            GsbError::Unauthorized { .. } => "unauthorized",
            GsbError::Forbidden { .. } => "forbidden",
            GsbError::InvalidName { .. } => "invalid_name",
            GsbError::Validation(_) => "validation_failed",
            GsbError::Api { .. } => "api_error",
            GsbError::Transport(_) => "transport_error",
            GsbError::Serialization(_) => "serialization_error",
            GsbError::Config(_) => "configuration_error",
            GsbError::Internal(_) => "internal_error",
        }
    }

    /// Whether re-authenticating could fix the failure
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, GsbError::Unauthorized { .. })
    }
}
