//! Property data types

use serde::{Deserialize, Serialize};

/// Declared data type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GsbDataType {
    /// Short single-line text
    String,
    /// Long multi-line text
    Text,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Date,
    /// Value from a `GsbEnum`
    Enum,
    /// Link to another entity definition
    Reference,
    /// File or image content
    Binary,
    /// Free-form JSON document
    Json,
}

impl GsbDataType {
    /// All data types, in catalogue order
    pub const ALL: [GsbDataType; 11] = [
        Self::String,
        Self::Text,
        Self::Integer,
        Self::Decimal,
        Self::Boolean,
        Self::DateTime,
        Self::Date,
        Self::Enum,
        Self::Reference,
        Self::Binary,
        Self::Json,
    ];

    /// Parse from string (accepts a few common aliases)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Some(Self::String),
            "text" | "longtext" => Some(Self::Text),
            "integer" | "int" | "long" => Some(Self::Integer),
            "decimal" | "number" | "double" | "float" => Some(Self::Decimal),
            "boolean" | "bool" => Some(Self::Boolean),
            "datetime" => Some(Self::DateTime),
            "date" => Some(Self::Date),
            "enum" => Some(Self::Enum),
            "reference" | "ref" => Some(Self::Reference),
            "binary" | "file" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::DateTime => "dateTime",
            Self::Date => "date",
            Self::Enum => "enum",
            Self::Reference => "reference",
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Text)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTime | Self::Date)
    }
}
