//! Grid filter model
//!
//! The filter model a data grid reports per column, and its translation to
//! and from query predicates.

use gsb_queries::{QueryFunction, SingleQuery};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnFilter;

/// Conditions offered by text, number and date filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCondition {
    Equals,
    NotEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    InRange,
    Blank,
    NotBlank,
}

impl FilterCondition {
    /// Predicate function and negation for this condition
    pub fn to_function(self) -> (QueryFunction, bool) {
        match self {
            Self::Equals => (QueryFunction::Equals, false),
            Self::NotEqual => (QueryFunction::Equals, true),
            Self::Contains => (QueryFunction::Contains, false),
            Self::NotContains => (QueryFunction::Contains, true),
            Self::StartsWith => (QueryFunction::StartsWith, false),
            Self::EndsWith => (QueryFunction::EndsWith, false),
            Self::LessThan => (QueryFunction::LessThan, false),
            Self::LessThanOrEqual => (QueryFunction::LessOrEqual, false),
            Self::GreaterThan => (QueryFunction::GreaterThan, false),
            Self::GreaterThanOrEqual => (QueryFunction::GreaterOrEqual, false),
            Self::InRange => (QueryFunction::Between, false),
            Self::Blank => (QueryFunction::IsNull, false),
            Self::NotBlank => (QueryFunction::IsNull, true),
        }
    }

    /// Inverse of [`FilterCondition::to_function`]
    pub fn from_function(function: QueryFunction, negate: bool) -> Option<Self> {
        let condition = match (function, negate) {
            (QueryFunction::Equals, false) => Self::Equals,
            (QueryFunction::Equals, true) => Self::NotEqual,
            (QueryFunction::Contains, false) => Self::Contains,
            (QueryFunction::Contains, true) => Self::NotContains,
            (QueryFunction::StartsWith, false) => Self::StartsWith,
            (QueryFunction::EndsWith, false) => Self::EndsWith,
            (QueryFunction::LessThan, false) => Self::LessThan,
            (QueryFunction::LessOrEqual, false) => Self::LessThanOrEqual,
            (QueryFunction::GreaterThan, false) => Self::GreaterThan,
            (QueryFunction::GreaterOrEqual, false) => Self::GreaterThanOrEqual,
            (QueryFunction::Between, false) => Self::InRange,
            (QueryFunction::IsNull, false) => Self::Blank,
            (QueryFunction::IsNull, true) => Self::NotBlank,
            _ => return None,
        };
        Some(condition)
    }

    pub fn needs_value(self) -> bool {
        !matches!(self, Self::Blank | Self::NotBlank)
    }
}

/// How combined conditions join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinOperator {
    And,
    Or,
}

/// A text, number or date filter, possibly combining several conditions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionFilter {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<FilterCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_to: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<JoinOperator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ConditionFilter>,
}

impl ConditionFilter {
    pub fn new(condition: FilterCondition, filter: impl Into<Value>) -> Self {
        Self {
            condition: Some(condition),
            filter: Some(filter.into()),
            ..Default::default()
        }
    }

    pub fn range(from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            condition: Some(FilterCondition::InRange),
            filter: Some(from.into()),
            filter_to: Some(to.into()),
            ..Default::default()
        }
    }

    pub fn blank(not: bool) -> Self {
        Self {
            condition: Some(if not {
                FilterCondition::NotBlank
            } else {
                FilterCondition::Blank
            }),
            ..Default::default()
        }
    }

    pub fn date(condition: FilterCondition, from: impl Into<String>) -> Self {
        Self {
            condition: Some(condition),
            date_from: Some(from.into()),
            ..Default::default()
        }
    }

    pub fn combined(operator: JoinOperator, conditions: Vec<ConditionFilter>) -> Self {
        Self {
            operator: Some(operator),
            conditions,
            ..Default::default()
        }
    }

    fn from_value(&self) -> Option<Value> {
        self.date_from
            .clone()
            .map(Value::String)
            .or_else(|| self.filter.clone())
            .filter(|v| !v.is_null())
    }

    fn to_value(&self) -> Option<Value> {
        self.date_to
            .clone()
            .map(Value::String)
            .or_else(|| self.filter_to.clone())
            .filter(|v| !v.is_null())
    }

    /// Predicate for this filter; incomplete conditions yield `None`
    pub fn to_query(&self, prop_name: &str) -> Option<SingleQuery> {
        if let Some(operator) = self.operator {
            let children: Vec<SingleQuery> = self
                .conditions
                .iter()
                .filter_map(|c| c.to_query(prop_name))
                .collect();
            return match (children.len(), operator) {
                (0, _) => None,
                (1, _) => children.into_iter().next(),
                (_, JoinOperator::And) => Some(SingleQuery::all(children)),
                (_, JoinOperator::Or) => Some(SingleQuery::any(children)),
            };
        }

        let condition = self.condition?;
        let (function, negate) = condition.to_function();

        let value = match condition {
            FilterCondition::Blank | FilterCondition::NotBlank => Value::Null,
            FilterCondition::InRange => Value::Array(vec![self.from_value()?, self.to_value()?]),
            _ => self.from_value()?,
        };

        let mut query = SingleQuery::new(prop_name, value, function);
        query.negate = negate;
        Some(query)
    }

    /// Rebuild a filter from a predicate; `dated` puts values in the date fields
    pub fn from_query(query: &SingleQuery, dated: bool) -> Option<Self> {
        if query.is_group() {
            let operator = match query.relation {
                gsb_queries::QueryRelation::And => JoinOperator::And,
                gsb_queries::QueryRelation::Or => JoinOperator::Or,
            };
            let conditions: Vec<Self> = query
                .children
                .iter()
                .filter_map(|c| Self::from_query(c, dated))
                .collect();
            return Some(Self::combined(operator, conditions));
        }

        let condition = FilterCondition::from_function(query.function, query.negate)?;
        let (from, to) = match (&query.value, condition) {
            (Value::Array(bounds), FilterCondition::InRange) if bounds.len() == 2 => {
                (Some(bounds[0].clone()), Some(bounds[1].clone()))
            }
            (_, FilterCondition::InRange) => return None,
            (Value::Null, _) => (None, None),
            (value, _) => (Some(value.clone()), None),
        };

        let mut filter = Self {
            condition: Some(condition),
            ..Default::default()
        };
        if dated {
            filter.date_from = from.map(value_to_string);
            filter.date_to = to.map(value_to_string);
        } else {
            filter.filter = from;
            filter.filter_to = to;
        }
        Some(filter)
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// A set filter: pick from a list of values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetFilter {
    /// `None` means no selection was made
    #[serde(default)]
    pub values: Option<Vec<Value>>,
}

impl SetFilter {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values: Some(values),
        }
    }
}

/// Filter model of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filterType", rename_all = "lowercase")]
pub enum ColumnFilterModel {
    Text(ConditionFilter),
    Number(ConditionFilter),
    Date(ConditionFilter),
    Set(SetFilter),
}

impl ColumnFilterModel {
    /// Predicate for the column, or `None` when the filter is incomplete
    pub fn to_query(&self, prop_name: &str) -> Option<SingleQuery> {
        match self {
            Self::Text(f) | Self::Number(f) | Self::Date(f) => f.to_query(prop_name),
            Self::Set(set) => set
                .values
                .as_ref()
                .map(|values| SingleQuery::in_values(prop_name, values.iter().cloned())),
        }
    }

    /// Rebuild the column filter from a predicate, shaped for the column's widget
    pub fn from_query(query: &SingleQuery, widget: ColumnFilter) -> Option<Self> {
        if query.function == QueryFunction::In && !query.negate {
            let values = match &query.value {
                Value::Array(values) => values.clone(),
                other => vec![other.clone()],
            };
            return Some(Self::Set(SetFilter::new(values)));
        }

        match widget {
            ColumnFilter::Date => ConditionFilter::from_query(query, true).map(Self::Date),
            ColumnFilter::Number => ConditionFilter::from_query(query, false).map(Self::Number),
            _ => ConditionFilter::from_query(query, false).map(Self::Text),
        }
    }
}
