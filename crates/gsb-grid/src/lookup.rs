//! Column kind lookup
//!
//! Editors, renderers and filters are picked from a static table keyed by
//! data type. Property names then refine the plain text kinds (an `email`
//! string gets an email editor) and references choose between the single
//! and multi pickers.

use gsb_models::{GsbDataType, GsbProperty};

use crate::column::{CellEditor, CellRenderer, ColumnFilter, ColumnKind};

const fn kind(editor: CellEditor, renderer: CellRenderer, filter: ColumnFilter) -> ColumnKind {
    ColumnKind::new(editor, renderer, filter)
}

/// Default column kind per data type
static COLUMN_TABLE: &[(GsbDataType, ColumnKind)] = &[
    (GsbDataType::String, kind(CellEditor::Text, CellRenderer::Text, ColumnFilter::Text)),
    (GsbDataType::Text, kind(CellEditor::LargeText, CellRenderer::Text, ColumnFilter::Text)),
    (GsbDataType::Integer, kind(CellEditor::Integer, CellRenderer::Number, ColumnFilter::Number)),
    (GsbDataType::Decimal, kind(CellEditor::Decimal, CellRenderer::Number, ColumnFilter::Number)),
    (GsbDataType::Boolean, kind(CellEditor::Checkbox, CellRenderer::Boolean, ColumnFilter::Boolean)),
    (GsbDataType::DateTime, kind(CellEditor::DateTime, CellRenderer::DateTime, ColumnFilter::Date)),
    (GsbDataType::Date, kind(CellEditor::Date, CellRenderer::Date, ColumnFilter::Date)),
    (GsbDataType::Enum, kind(CellEditor::Select, CellRenderer::EnumTitle, ColumnFilter::Set)),
    (GsbDataType::Reference, kind(CellEditor::Reference, CellRenderer::Reference, ColumnFilter::Reference)),
    (GsbDataType::Binary, kind(CellEditor::File, CellRenderer::File, ColumnFilter::None)),
    (GsbDataType::Json, kind(CellEditor::Json, CellRenderer::Json, ColumnFilter::None)),
];

const MULTI_REFERENCE: ColumnKind = kind(
    CellEditor::MultiReference,
    CellRenderer::ReferenceList,
    ColumnFilter::MultiReference,
);

/// Name fragments that refine text and binary columns, checked in order
static NAME_HINTS: &[(&str, ColumnKind)] = &[
    ("password", kind(CellEditor::Password, CellRenderer::Masked, ColumnFilter::None)),
    ("email", kind(CellEditor::Email, CellRenderer::Email, ColumnFilter::Text)),
    ("phone", kind(CellEditor::Phone, CellRenderer::Text, ColumnFilter::Text)),
    ("image", kind(CellEditor::Image, CellRenderer::Image, ColumnFilter::None)),
    ("url", kind(CellEditor::Url, CellRenderer::Link, ColumnFilter::Text)),
    ("file", kind(CellEditor::File, CellRenderer::File, ColumnFilter::None)),
];

/// Default kind for a data type
pub fn kind_for_type(data_type: GsbDataType) -> ColumnKind {
    COLUMN_TABLE
        .iter()
        .find(|(dt, _)| *dt == data_type)
        .map(|(_, kind)| *kind)
        .unwrap_or(kind(CellEditor::Text, CellRenderer::Raw, ColumnFilter::Text))
}

/// Kind implied by a property name, if any
pub fn kind_for_name(name: &str) -> Option<ColumnKind> {
    let name = name.to_ascii_lowercase();
    NAME_HINTS
        .iter()
        .find(|(hint, _)| name.contains(hint))
        .map(|(_, kind)| *kind)
}

/// Kind for a property: name hints first, then the data type table
pub fn kind_for_property(property: &GsbProperty) -> ColumnKind {
    let data_type = property.data_type();
    match data_type {
        GsbDataType::Reference if property.is_multi_reference() => MULTI_REFERENCE,
        GsbDataType::String | GsbDataType::Binary => {
            kind_for_name(&property.name).unwrap_or_else(|| kind_for_type(data_type))
        }
        _ => kind_for_type(data_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_type() {
        for data_type in GsbDataType::ALL {
            assert!(
                COLUMN_TABLE.iter().any(|(dt, _)| *dt == data_type),
                "missing {:?}",
                data_type
            );
        }
    }

    #[test]
    fn test_kind_for_type() {
        assert_eq!(kind_for_type(GsbDataType::Integer).filter, ColumnFilter::Number);
        assert_eq!(kind_for_type(GsbDataType::Date).editor, CellEditor::Date);
        assert_eq!(kind_for_type(GsbDataType::Enum).renderer, CellRenderer::EnumTitle);
    }

    #[test]
    fn test_name_hints() {
        let email = GsbProperty::new("contactEmail", GsbDataType::String);
        assert_eq!(kind_for_property(&email).editor, CellEditor::Email);

        let phone = GsbProperty::new("PhoneNumber", GsbDataType::String);
        assert_eq!(kind_for_property(&phone).editor, CellEditor::Phone);

        let password = GsbProperty::new("password", GsbDataType::String);
        assert_eq!(kind_for_property(&password).renderer, CellRenderer::Masked);

        let logo = GsbProperty::new("logoImage", GsbDataType::Binary);
        assert_eq!(kind_for_property(&logo).editor, CellEditor::Image);

        let profile = GsbProperty::new("profileUrl", GsbDataType::String);
        assert_eq!(kind_for_property(&profile).editor, CellEditor::Url);

        let plain = GsbProperty::new("name", GsbDataType::String);
        assert_eq!(kind_for_property(&plain).editor, CellEditor::Text);
    }

    #[test]
    fn test_name_hints_ignore_other_types() {
        let count = GsbProperty::new("emailCount", GsbDataType::Integer);
        assert_eq!(kind_for_property(&count).editor, CellEditor::Integer);
    }

    #[test]
    fn test_reference_multiplicity() {
        let single = GsbProperty::reference("customer", "Customer", false);
        let kind = kind_for_property(&single);
        assert_eq!(kind.editor, CellEditor::Reference);
        assert_eq!(kind.filter, ColumnFilter::Reference);

        let multi = GsbProperty::reference("tags", "Tag", true);
        let kind = kind_for_property(&multi);
        assert_eq!(kind.editor, CellEditor::MultiReference);
        assert_eq!(kind.filter, ColumnFilter::MultiReference);
        assert_eq!(kind.renderer, CellRenderer::ReferenceList);
    }
}
