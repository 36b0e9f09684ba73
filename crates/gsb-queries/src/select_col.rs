//! Column projections
//!
//! Select columns decide which properties the server returns. An empty
//! projection means "all columns".

use serde::{Deserialize, Serialize};

/// Aggregate functions for grouped queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggFunction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "count" => Some(Self::Count),
            "sum" => Some(Self::Sum),
            "avg" | "average" => Some(Self::Avg),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A projected column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCol {
    /// Property name (dotted paths reach into references)
    pub prop_name: String,

    /// Name of the column in the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agg_func: Option<AggFunction>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub group_by: bool,
}

impl SelectCol {
    /// Create a plain projection
    pub fn new(prop_name: impl Into<String>) -> Self {
        Self {
            prop_name: prop_name.into(),
            alias: None,
            agg_func: None,
            group_by: false,
        }
    }

    /// Create an aggregated projection
    pub fn aggregate(prop_name: impl Into<String>, agg_func: AggFunction) -> Self {
        Self {
            agg_func: Some(agg_func),
            ..Self::new(prop_name)
        }
    }

    pub fn count(prop_name: impl Into<String>) -> Self {
        Self::aggregate(prop_name, AggFunction::Count)
    }

    pub fn sum(prop_name: impl Into<String>) -> Self {
        Self::aggregate(prop_name, AggFunction::Sum)
    }

    pub fn avg(prop_name: impl Into<String>) -> Self {
        Self::aggregate(prop_name, AggFunction::Avg)
    }

    pub fn min(prop_name: impl Into<String>) -> Self {
        Self::aggregate(prop_name, AggFunction::Min)
    }

    pub fn max(prop_name: impl Into<String>) -> Self {
        Self::aggregate(prop_name, AggFunction::Max)
    }

    /// Create a group-by projection
    pub fn group_by(prop_name: impl Into<String>) -> Self {
        Self {
            group_by: true,
            ..Self::new(prop_name)
        }
    }

    /// Set the alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name of the column in the result set
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.prop_name)
    }

    pub fn is_aggregate(&self) -> bool {
        self.agg_func.is_some()
    }

    /// Same property projected the same way
    pub fn same_column(&self, other: &SelectCol) -> bool {
        self.prop_name == other.prop_name
            && self.alias == other.alias
            && self.agg_func == other.agg_func
    }
}

impl From<&str> for SelectCol {
    fn from(prop_name: &str) -> Self {
        SelectCol::new(prop_name)
    }
}

impl From<String> for SelectCol {
    fn from(prop_name: String) -> Self {
        SelectCol::new(prop_name)
    }
}
