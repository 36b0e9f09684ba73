//! Naming rules for entity definitions and properties
//!
//! Names become identifiers on the server, so they must start with a letter
//! and contain only ASCII letters and digits. The rules are checked locally so
//! that obviously bad names never reach a uniqueness lookup.

use gsb_core::error::GsbError;
use regex::Regex;
use std::sync::LazyLock;

use crate::entity_def::GsbEntityDef;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap()
});

/// Longest accepted name
pub const MAX_NAME_LENGTH: usize = 128;

/// Property names the server manages on every entity definition
const RESERVED_PROPERTY_NAMES: &[&str] = &[
    "id", "createDate", "lastUpdateDate", "createdBy", "lastUpdatedBy",
];

/// Convert free text such as a table title into a PascalCase name
///
/// Words are split on anything that is not an ASCII letter or digit; the first
/// letter of each word is upper-cased and the rest is kept as typed.
pub fn to_pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert free text into a camelCase name, as used for property names
pub fn to_camel_case(text: &str) -> String {
    let pascal = to_pascal_case(text);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Whether the name matches `^[A-Za-z][A-Za-z0-9]*$`
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Whether the server manages a property of this name itself
pub fn is_reserved_property_name(name: &str) -> bool {
    RESERVED_PROPERTY_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Check the local naming rules, reporting the first violation
pub fn validate_name(name: &str) -> Result<(), GsbError> {
    if name.trim().is_empty() {
        return Err(GsbError::invalid_name(name, "can't be blank"));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(GsbError::invalid_name(
            name,
            format!("is too long (maximum is {} characters)", MAX_NAME_LENGTH),
        ));
    }

    if !is_valid_name(name) {
        let reason = if name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            "may only contain letters and digits"
        } else {
            "must start with a letter"
        };
        return Err(GsbError::invalid_name(name, reason));
    }

    Ok(())
}

/// Check a new property name against the definition being edited
///
/// `current` is the property's existing name when renaming, so that keeping
/// the same name is not reported as a collision.
pub fn validate_property_name(
    entity_def: &GsbEntityDef,
    name: &str,
    current: Option<&str>,
) -> Result<(), GsbError> {
    validate_name(name)?;

    if is_reserved_property_name(name) {
        return Err(GsbError::invalid_name(name, "is reserved"));
    }

    let is_rename_to_self = current.map(|c| c.eq_ignore_ascii_case(name)).unwrap_or(false);
    if !is_rename_to_self && entity_def.property_ignore_case(name).is_some() {
        return Err(GsbError::invalid_name(
            name,
            format!("already exists on {}", entity_def.name),
        ));
    }

    Ok(())
}
