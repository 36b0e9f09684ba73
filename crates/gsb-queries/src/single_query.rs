//! Query predicates
//!
//! A `SingleQuery` is one condition of a `QueryParams`: a property, a
//! comparison function and a value. Predicates can be negated, carry an
//! aggregate for grouped queries, or hold child predicates combined with
//! AND/OR.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::select_col::AggFunction;

/// Comparison functions understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryFunction {
    /// Equals (=)
    #[default]
    Equals,
    /// SQL LIKE with caller-supplied wildcards
    Like,
    /// Substring match
    Contains,
    StartsWith,
    EndsWith,
    /// Value is one of a list
    In,
    /// Value lies in `[from, to]`
    Between,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    /// Property has no value
    IsNull,
    /// `(prop & value) != 0`
    BitAnd,
    /// `(prop | value) != 0`
    BitOr,
    /// Regular expression match
    Regex,
}

impl QueryFunction {
    /// Parse operator from its wire name or a symbolic shorthand
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "equals" | "=" | "==" => Some(Self::Equals),
            "like" => Some(Self::Like),
            "contains" | "~" => Some(Self::Contains),
            "startsWith" => Some(Self::StartsWith),
            "endsWith" => Some(Self::EndsWith),
            "in" => Some(Self::In),
            "between" => Some(Self::Between),
            "greaterThan" | ">" => Some(Self::GreaterThan),
            "greaterOrEqual" | ">=" => Some(Self::GreaterOrEqual),
            "lessThan" | "<" => Some(Self::LessThan),
            "lessOrEqual" | "<=" => Some(Self::LessOrEqual),
            "isNull" => Some(Self::IsNull),
            "bitAnd" | "&" => Some(Self::BitAnd),
            "bitOr" | "|" => Some(Self::BitOr),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::Like => "like",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::EndsWith => "endsWith",
            Self::In => "in",
            Self::Between => "between",
            Self::GreaterThan => "greaterThan",
            Self::GreaterOrEqual => "greaterOrEqual",
            Self::LessThan => "lessThan",
            Self::LessOrEqual => "lessOrEqual",
            Self::IsNull => "isNull",
            Self::BitAnd => "bitAnd",
            Self::BitOr => "bitOr",
            Self::Regex => "regex",
        }
    }

    /// Check if this function compares against a value
    pub fn requires_value(&self) -> bool {
        !matches!(self, Self::IsNull)
    }

    /// Check if the value must be a list
    pub fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::Between)
    }
}

/// How child predicates are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryRelation {
    #[default]
    And,
    Or,
}

impl QueryRelation {
    fn is_and(&self) -> bool {
        *self == Self::And
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A single predicate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleQuery {
    /// Optional query name; named predicates replace each other
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Property being compared (dotted paths reach into references)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop_name: Option<String>,

    #[serde(default)]
    pub function: QueryFunction,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,

    /// Invert the result
    #[serde(default, skip_serializing_if = "is_false")]
    pub negate: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agg_func: Option<AggFunction>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub group_by: bool,

    #[serde(default, skip_serializing_if = "QueryRelation::is_and")]
    pub relation: QueryRelation,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SingleQuery>,
}

impl SingleQuery {
    /// Create a new predicate
    pub fn new(prop_name: impl Into<String>, value: impl Into<Value>, function: QueryFunction) -> Self {
        Self {
            prop_name: Some(prop_name.into()),
            value: value.into(),
            function,
            ..Default::default()
        }
    }

    pub fn equals(prop_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(prop_name, value, QueryFunction::Equals)
    }

    pub fn not_equals(prop_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::equals(prop_name, value).not()
    }

    pub fn like(prop_name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(prop_name, pattern.into(), QueryFunction::Like)
    }

    pub fn contains(prop_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(prop_name, text.into(), QueryFunction::Contains)
    }

    pub fn starts_with(prop_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(prop_name, text.into(), QueryFunction::StartsWith)
    }

    pub fn ends_with(prop_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(prop_name, text.into(), QueryFunction::EndsWith)
    }

    pub fn in_values<V: Into<Value>>(
        prop_name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new(prop_name, Value::Array(values), QueryFunction::In)
    }

    pub fn between(prop_name: impl Into<String>, from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self::new(
            prop_name,
            Value::Array(vec![from.into(), to.into()]),
            QueryFunction::Between,
        )
    }

    pub fn greater_than(prop_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(prop_name, value, QueryFunction::GreaterThan)
    }

    pub fn greater_or_equal(prop_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(prop_name, value, QueryFunction::GreaterOrEqual)
    }

    pub fn less_than(prop_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(prop_name, value, QueryFunction::LessThan)
    }

    pub fn less_or_equal(prop_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(prop_name, value, QueryFunction::LessOrEqual)
    }

    pub fn is_null(prop_name: impl Into<String>) -> Self {
        Self::new(prop_name, Value::Null, QueryFunction::IsNull)
    }

    pub fn is_not_null(prop_name: impl Into<String>) -> Self {
        Self::is_null(prop_name).not()
    }

    pub fn bit_and(prop_name: impl Into<String>, mask: i64) -> Self {
        Self::new(prop_name, mask, QueryFunction::BitAnd)
    }

    pub fn bit_or(prop_name: impl Into<String>, mask: i64) -> Self {
        Self::new(prop_name, mask, QueryFunction::BitOr)
    }

    pub fn regex(prop_name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(prop_name, pattern.into(), QueryFunction::Regex)
    }

    /// All children must match
    pub fn all(children: impl IntoIterator<Item = SingleQuery>) -> Self {
        Self::group(QueryRelation::And, children)
    }

    /// Any child may match
    pub fn any(children: impl IntoIterator<Item = SingleQuery>) -> Self {
        Self::group(QueryRelation::Or, children)
    }

    pub fn group(relation: QueryRelation, children: impl IntoIterator<Item = SingleQuery>) -> Self {
        Self {
            relation,
            children: children.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Give the predicate a query name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Toggle negation
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Compare the aggregate of the property rather than the raw value
    pub fn with_agg(mut self, agg_func: AggFunction) -> Self {
        self.agg_func = Some(agg_func);
        self
    }

    pub fn grouped(mut self) -> Self {
        self.group_by = true;
        self
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// Check the predicate is complete enough to send
    pub fn is_valid(&self) -> bool {
        if self.is_group() {
            return self.children.iter().all(|c| c.is_valid());
        }

        match self.prop_name.as_deref() {
            None | Some("") => return false,
            _ => {}
        }

        if self.function.requires_value() && self.value.is_null() {
            return false;
        }

        if self.function == QueryFunction::Between {
            return matches!(&self.value, Value::Array(v) if v.len() == 2);
        }

        true
    }

    /// Property names referenced by this predicate and its children
    pub fn referenced_props(&self) -> Vec<&str> {
        let mut props: Vec<&str> = self.prop_name.as_deref().into_iter().collect();
        for child in &self.children {
            props.extend(child.referenced_props());
        }
        props
    }
}
