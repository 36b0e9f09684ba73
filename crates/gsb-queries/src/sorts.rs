//! Sort columns

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortDirection {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A single sort column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCol {
    pub prop_name: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortCol {
    pub fn new(prop_name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            prop_name: prop_name.into(),
            direction,
        }
    }

    pub fn asc(prop_name: impl Into<String>) -> Self {
        Self::new(prop_name, SortDirection::Asc)
    }

    pub fn desc(prop_name: impl Into<String>) -> Self {
        Self::new(prop_name, SortDirection::Desc)
    }

    pub fn reversed(mut self) -> Self {
        self.direction = self.direction.reverse();
        self
    }

    /// Parse `prop`, `prop:asc` or `prop:desc`, or a leading `-` for descending
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(prop) = text.strip_prefix('-') {
            return Some(Self::desc(prop));
        }

        match text.split_once(':') {
            Some((prop, dir)) => SortDirection::from_str(dir).map(|d| Self::new(prop, d)),
            None => Some(Self::asc(text)),
        }
    }
}

/// Parse a comma separated sort string such as `name,-createDate`
pub fn parse_sort_list(text: &str) -> Vec<SortCol> {
    text.split(',').filter_map(SortCol::parse).collect()
}
