//! Property metadata
//!
//! A `GsbProperty` is one column of an entity definition. Its storage type
//! comes from the `GsbPropertyDef` it points at; reference and enum
//! properties additionally name the definition or enumeration they draw
//! values from.

use gsb_core::traits::{Id, Identifiable, Named};
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

use crate::data_type::GsbDataType;

/// Catalogue entry describing a property type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GsbPropertyDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    pub data_type: GsbDataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,
}

impl GsbPropertyDef {
    pub fn new(name: impl Into<String>, data_type: GsbDataType) -> Self {
        Self {
            id: None,
            name: name.into(),
            data_type,
            max_length: None,
            scale: None,
        }
    }

    /// The built-in property def for a data type
    pub fn of(data_type: GsbDataType) -> Self {
        Self::new(data_type.as_str(), data_type)
    }
}

/// Lightweight pointer to an entity definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntDefRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
}

impl EntDefRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Cardinality of a reference, seen from the owning side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefType {
    OneToOne,
    OneToMany,
    #[default]
    ManyToOne,
    ManyToMany,
}

impl RefType {
    /// Whether the relation is stored in a mapping table
    pub fn is_mapped(&self) -> bool {
        matches!(self, Self::ManyToMany)
    }
}

/// Bitmask of the forms a property appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormModes(u32);

impl FormModes {
    pub const NONE: FormModes = FormModes(0);
    pub const CREATE: FormModes = FormModes(1);
    pub const EDIT: FormModes = FormModes(2);
    pub const VIEW: FormModes = FormModes(4);
    pub const LIST: FormModes = FormModes(8);
    pub const ALL: FormModes = FormModes(15);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: FormModes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: FormModes) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: FormModes) {
        self.0 &= !other.0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for FormModes {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for FormModes {
    type Output = FormModes;

    fn bitor(self, rhs: FormModes) -> FormModes {
        FormModes(self.0 | rhs.0)
    }
}

/// A column of an entity definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GsbProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,

    /// Property name, unique within its entity definition
    pub name: String,

    /// Display caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Storage type
    pub prop_def: GsbPropertyDef,

    #[serde(default)]
    pub is_required: bool,

    #[serde(default)]
    pub is_unique: bool,

    #[serde(default)]
    pub is_primary_key: bool,

    /// Managed by the server (id, timestamps, owner)
    #[serde(default)]
    pub is_system: bool,

    /// Holds several values (multi-reference, multi-select enum)
    #[serde(default)]
    pub is_multiple: bool,

    /// Target definition of a reference property
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_ent_def: Option<EntDefRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<RefType>,

    /// Enumeration name for enum properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,

    #[serde(default)]
    pub form_modes: FormModes,

    #[serde(default)]
    pub order_number: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl Identifiable for GsbProperty {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Named for GsbProperty {
    fn name(&self) -> &str {
        &self.name
    }
}

impl GsbProperty {
    /// Create a property of the given data type
    pub fn new(name: impl Into<String>, data_type: GsbDataType) -> Self {
        Self {
            id: None,
            name: name.into(),
            title: None,
            prop_def: GsbPropertyDef::of(data_type),
            is_required: false,
            is_unique: false,
            is_primary_key: false,
            is_system: false,
            is_multiple: false,
            ref_ent_def: None,
            ref_type: None,
            enum_name: None,
            form_modes: FormModes::ALL,
            order_number: 0,
            default_value: None,
        }
    }

    /// Create a reference property
    pub fn reference(name: impl Into<String>, target: impl Into<String>, multiple: bool) -> Self {
        let mut prop = Self::new(name, GsbDataType::Reference);
        prop.ref_ent_def = Some(EntDefRef::named(target));
        prop.ref_type = Some(if multiple {
            RefType::ManyToMany
        } else {
            RefType::ManyToOne
        });
        prop.is_multiple = multiple;
        prop
    }

    /// Create an enum property
    pub fn enumeration(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        let mut prop = Self::new(name, GsbDataType::Enum);
        prop.enum_name = Some(enum_name.into());
        prop
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    pub fn with_form_modes(mut self, modes: FormModes) -> Self {
        self.form_modes = modes;
        self
    }

    pub fn with_order(mut self, order_number: i32) -> Self {
        self.order_number = order_number;
        self
    }

    pub fn data_type(&self) -> GsbDataType {
        self.prop_def.data_type
    }

    pub fn is_reference(&self) -> bool {
        self.data_type() == GsbDataType::Reference
    }

    /// Reference holding several targets
    ///
    /// Only `isMultiple` decides; `refType` describes the relation on the server.
    pub fn is_multi_reference(&self) -> bool {
        self.is_reference() && self.is_multiple
    }

    pub fn ref_target(&self) -> Option<&str> {
        self.ref_ent_def.as_ref().map(|r| r.name.as_str())
    }

    /// Caption shown in grids and forms
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Visible in list views
    pub fn is_listed(&self) -> bool {
        self.form_modes.contains(FormModes::LIST)
    }

    /// Writable from an edit form
    pub fn is_editable(&self) -> bool {
        !self.is_system && self.form_modes.contains(FormModes::EDIT)
    }
}
