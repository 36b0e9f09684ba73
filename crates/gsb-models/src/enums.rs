//! Enumerations referenced by enum properties

use gsb_core::traits::{Id, Identifiable, Named};
use serde::{Deserialize, Serialize};

/// Name under which enumerations are stored
pub const ENUM_ENTITY: &str = "GsbEnum";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GsbEnumValue {
    pub value: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GsbEnumValue {
    pub fn new(value: i64, name: impl Into<String>) -> Self {
        Self {
            value,
            name: name.into(),
            title: None,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GsbEnum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    #[serde(default)]
    pub values: Vec<GsbEnumValue>,
}

impl Identifiable for GsbEnum {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Named for GsbEnum {
    fn name(&self) -> &str {
        &self.name
    }
}

impl GsbEnum {
    pub fn new(name: impl Into<String>, values: Vec<GsbEnumValue>) -> Self {
        Self {
            id: None,
            name: name.into(),
            values,
        }
    }

    pub fn value(&self, value: i64) -> Option<&GsbEnumValue> {
        self.values.iter().find(|v| v.value == value)
    }

    pub fn by_name(&self, name: &str) -> Option<&GsbEnumValue> {
        self.values.iter().find(|v| v.name == name)
    }

    /// Caption for a stored value, if it is known
    pub fn title_of(&self, value: i64) -> Option<&str> {
        self.value(value).map(|v| v.display_title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_lookup() {
        let mut shipped = GsbEnumValue::new(2, "shipped");
        shipped.title = Some("Shipped".to_string());
        let status = GsbEnum::new("OrderStatus", vec![GsbEnumValue::new(1, "open"), shipped]);

        assert_eq!(status.title_of(1), Some("open"));
        assert_eq!(status.title_of(2), Some("Shipped"));
        assert_eq!(status.title_of(3), None);
        assert_eq!(status.by_name("shipped").map(|v| v.value), Some(2));
    }
}
