//! Entity records and query results
//!
//! Records are schemaless on the client: a `GsbEntity` is the JSON object the
//! server returned, with typed accessors on top.

use gsb_core::traits::Identifiable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the identifier field on every record
pub const ID_FIELD: &str = "id";

/// A single record of some entity definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GsbEntity(Map<String, Value>);

impl Identifiable for GsbEntity {
    fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }
}

impl GsbEntity {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// A record carrying only its identifier, as used for mapped items
    pub fn with_id(id: impl Into<String>) -> Self {
        let mut entity = Self::new();
        entity.set(ID_FIELD, Value::String(id.into()));
        entity
    }

    pub fn get(&self, prop: &str) -> Option<&Value> {
        self.0.get(prop)
    }

    pub fn get_str(&self, prop: &str) -> Option<&str> {
        self.0.get(prop).and_then(Value::as_str)
    }

    pub fn get_i64(&self, prop: &str) -> Option<i64> {
        self.0.get(prop).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, prop: &str) -> Option<f64> {
        self.0.get(prop).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, prop: &str) -> Option<bool> {
        self.0.get(prop).and_then(Value::as_bool)
    }

    /// Nested record behind a single reference property
    pub fn get_ref(&self, prop: &str) -> Option<GsbEntity> {
        match self.0.get(prop) {
            Some(Value::Object(map)) => Some(GsbEntity(map.clone())),
            _ => None,
        }
    }

    /// Nested records behind a multi reference property
    pub fn get_refs(&self, prop: &str) -> Vec<GsbEntity> {
        match self.0.get(prop) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned().map(GsbEntity))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn set(&mut self, prop: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(prop.into(), value.into());
        self
    }

    pub fn remove(&mut self, prop: &str) -> Option<Value> {
        self.0.remove(prop)
    }

    pub fn contains(&self, prop: &str) -> bool {
        self.0.contains_key(prop)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Decode the record into a typed model
    pub fn to_model<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

impl From<Map<String, Value>> for GsbEntity {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Response of the query endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T = GsbEntity> {
    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,
    /// Present when the query asked for `calcTotalCount`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            total_count: None,
        }
    }
}

impl<T> QueryResult<T> {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.entities.first()
    }

    /// Total rows on the server, falling back to the rows returned
    pub fn total(&self) -> u64 {
        self.total_count.unwrap_or(self.entities.len() as u64)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryResult<U> {
        QueryResult {
            entities: self.entities.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}
