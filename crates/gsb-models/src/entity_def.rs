//! Entity definition model
//!
//! An entity definition is the server-side schema of a table: its name and
//! its ordered list of properties.

use chrono::{DateTime, Utc};
use gsb_core::traits::{Id, Identifiable, Named};
use serde::{Deserialize, Serialize};

use crate::data_type::GsbDataType;
use crate::property::GsbProperty;

/// Name under which entity definitions are themselves stored
pub const ENTITY_DEF_ENTITY: &str = "GsbEntityDef";

/// Schema of a GSB table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GsbEntityDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,

    /// Unique PascalCase name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: Vec<GsbProperty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_date: Option<DateTime<Utc>>,
}

impl Identifiable for GsbEntityDef {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Named for GsbEntityDef {
    fn name(&self) -> &str {
        &self.name
    }
}

impl GsbEntityDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            title: None,
            description: None,
            properties: Vec::new(),
            create_date: None,
            last_update_date: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a property, numbering it after the existing ones
    pub fn with_property(mut self, mut property: GsbProperty) -> Self {
        if property.order_number == 0 {
            property.order_number = self.properties.len() as i32 + 1;
        }
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&GsbProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Case-insensitive lookup, used for name collision checks
    pub fn property_ignore_case(&self, name: &str) -> Option<&GsbProperty> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Properties ordered by their order number
    pub fn ordered_properties(&self) -> Vec<&GsbProperty> {
        let mut props: Vec<&GsbProperty> = self.properties.iter().collect();
        props.sort_by_key(|p| p.order_number);
        props
    }

    /// Properties shown in list views, in display order
    pub fn listed_properties(&self) -> Vec<&GsbProperty> {
        self.ordered_properties()
            .into_iter()
            .filter(|p| p.is_listed())
            .collect()
    }

    pub fn reference_properties(&self) -> impl Iterator<Item = &GsbProperty> {
        self.properties.iter().filter(|p| p.is_reference())
    }

    pub fn properties_of(&self, data_type: GsbDataType) -> impl Iterator<Item = &GsbProperty> {
        self.properties
            .iter()
            .filter(move |p| p.data_type() == data_type)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}
