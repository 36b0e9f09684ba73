//! # gsb-grid
//!
//! Data grid support for GSB entity lists.
//!
//! - `column` - Column descriptors (editor, renderer, filter)
//! - `lookup` - Column kinds by data type and property name
//! - `builder` - Columns for an entity definition, with enum and reference metadata
//! - `filter_model` - Grid filter model and its predicates
//! - `mapping` - Grid state <-> query translation

pub mod column;
pub mod lookup;
pub mod builder;
pub mod filter_model;
pub mod mapping;

pub use column::{CellEditor, CellRenderer, ColumnDef, ColumnFilter, ColumnKind};
pub use lookup::{kind_for_name, kind_for_property, kind_for_type};
pub use builder::{build_column, build_columns, display_prop, DefinitionLookup};
pub use filter_model::{
    ColumnFilterModel, ConditionFilter, FilterCondition, JoinOperator, SetFilter,
};
pub use mapping::{
    apply_block, apply_filter_model, apply_sort_model, apply_state_to_columns,
    apply_visibility, grid_state_from_query, last_row, ColumnToggle, FilterModel, GridState,
    SortModelItem,
};
