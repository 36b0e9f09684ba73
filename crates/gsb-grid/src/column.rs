//! Grid column descriptors
//!
//! A [`ColumnDef`] is what a data grid needs to show one property: which
//! editor edits the cell, how the value is rendered and which filter widget
//! narrows the column. It serializes in the camelCase shape grid front ends
//! consume.

use gsb_models::{GsbDataType, GsbEnumValue, GsbProperty};
use serde::{Deserialize, Serialize};

/// Cell editor widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellEditor {
    Text,
    LargeText,
    Integer,
    Decimal,
    Checkbox,
    DateTime,
    Date,
    /// Drop-down over enum values
    Select,
    /// Picker for one referenced entity
    Reference,
    /// Picker for several referenced entities
    MultiReference,
    Email,
    Phone,
    Url,
    Password,
    Image,
    File,
    Json,
}

/// Cell renderers / formatters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellRenderer {
    Text,
    Number,
    Boolean,
    DateTime,
    Date,
    /// Enum value shown by its title
    EnumTitle,
    /// Referenced entity shown by its display property
    Reference,
    ReferenceList,
    Email,
    Link,
    /// Value hidden behind a mask
    Masked,
    Image,
    File,
    Json,
    /// Value shown as received
    Raw,
}

/// Column filter widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnFilter {
    Text,
    Number,
    Date,
    Boolean,
    /// Pick from a fixed value list
    Set,
    Reference,
    MultiReference,
    /// Column cannot be filtered
    None,
}

impl ColumnFilter {
    pub fn is_filterable(&self) -> bool {
        *self != Self::None
    }
}

/// Editor, renderer and filter chosen for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnKind {
    pub editor: CellEditor,
    pub renderer: CellRenderer,
    pub filter: ColumnFilter,
}

impl ColumnKind {
    pub const fn new(editor: CellEditor, renderer: CellRenderer, filter: ColumnFilter) -> Self {
        Self {
            editor,
            renderer,
            filter,
        }
    }
}

/// A grid column bound to one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Column id, equal to the property name
    pub col_id: String,
    pub header_name: String,
    pub data_type: GsbDataType,
    #[serde(flatten)]
    pub kind: ColumnKind,
    pub editable: bool,
    pub sortable: bool,
    pub hide: bool,
    pub required: bool,
    /// Values offered by enum columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<GsbEnumValue>,
    /// Target entity definition of reference columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_ent_def: Option<String>,
    /// Property of the target shown for a reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_display_prop: Option<String>,
}

impl ColumnDef {
    /// Create a column for a property with an already chosen kind
    pub fn for_property(property: &GsbProperty, kind: ColumnKind) -> Self {
        Self {
            col_id: property.name.clone(),
            header_name: property.display_title().to_string(),
            data_type: property.data_type(),
            kind,
            editable: property.is_editable(),
            sortable: !matches!(
                property.data_type(),
                GsbDataType::Binary | GsbDataType::Json
            ) && !property.is_multi_reference(),
            hide: !property.is_listed(),
            required: property.is_required,
            enum_values: Vec::new(),
            ref_ent_def: property.ref_target().map(str::to_string),
            ref_display_prop: None,
        }
    }

    /// Show the value as received; keeps the editor
    pub fn with_raw_rendering(mut self) -> Self {
        self.kind.renderer = CellRenderer::Raw;
        if matches!(
            self.kind.filter,
            ColumnFilter::Set | ColumnFilter::Reference | ColumnFilter::MultiReference
        ) {
            self.kind.filter = ColumnFilter::Text;
        }
        self
    }

    pub fn is_raw(&self) -> bool {
        self.kind.renderer == CellRenderer::Raw
    }

    pub fn title_of(&self, value: i64) -> Option<&str> {
        self.enum_values
            .iter()
            .find(|v| v.value == value)
            .map(|v| v.display_title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::kind_for_property;
    use gsb_models::RefType;
    use serde_json::json;

    fn text_kind() -> ColumnKind {
        ColumnKind::new(CellEditor::Text, CellRenderer::Text, ColumnFilter::Text)
    }

    #[test]
    fn test_column_from_property() {
        let prop = GsbProperty::new("number", GsbDataType::String)
            .with_title("Order number")
            .required();
        let col = ColumnDef::for_property(&prop, text_kind());

        assert_eq!(col.col_id, "number");
        assert_eq!(col.header_name, "Order number");
        assert!(col.required);
        assert!(col.sortable);
    }

    #[test]
    fn test_reference_sortability_follows_is_multiple() {
        let mut lines = GsbProperty::reference("lines", "OrderLine", false);
        lines.ref_type = Some(RefType::OneToMany);
        let col = ColumnDef::for_property(&lines, kind_for_property(&lines));
        assert_eq!(col.kind.editor, CellEditor::Reference);
        assert!(col.sortable);

        let tags = GsbProperty::reference("tags", "Tag", true);
        let col = ColumnDef::for_property(&tags, kind_for_property(&tags));
        assert_eq!(col.kind.editor, CellEditor::MultiReference);
        assert!(!col.sortable);
    }

    #[test]
    fn test_raw_rendering_drops_set_filter() {
        let prop = GsbProperty::reference("customer", "Customer", false);
        let kind = ColumnKind::new(
            CellEditor::Reference,
            CellRenderer::Reference,
            ColumnFilter::Reference,
        );
        let col = ColumnDef::for_property(&prop, kind).with_raw_rendering();

        assert!(col.is_raw());
        assert_eq!(col.kind.editor, CellEditor::Reference);
        assert_eq!(col.kind.filter, ColumnFilter::Text);
        assert_eq!(col.ref_ent_def.as_deref(), Some("Customer"));
    }

    #[test]
    fn test_serialization_flattens_kind() {
        let prop = GsbProperty::new("notes", GsbDataType::Text);
        let value = serde_json::to_value(ColumnDef::for_property(&prop, text_kind())).unwrap();
        assert_eq!(value["editor"], json!("text"));
        assert_eq!(value["renderer"], json!("text"));
        assert_eq!(value["colId"], json!("notes"));
        assert!(value.get("enumValues").is_none());
    }
}
