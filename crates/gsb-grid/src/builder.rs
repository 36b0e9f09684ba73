//! Column building
//!
//! Turns an entity definition into grid columns. Enum values and reference
//! targets are loaded through [`DefinitionLookup`]; a lookup failure never
//! fails the grid, the affected column just renders raw values.

use async_trait::async_trait;
use gsb_core::GsbResult;
use gsb_models::{GsbDataType, GsbEntityDef, GsbEnum, GsbProperty};
use tracing::{debug, warn};

use crate::column::ColumnDef;
use crate::lookup::kind_for_property;

/// Property names tried, in order, to label a referenced entity
const DISPLAY_PROP_CANDIDATES: &[&str] = &["name", "title", "code", "number"];

/// Source of the metadata column building depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefinitionLookup: Send + Sync {
    async fn entity_def(&self, name: &str) -> GsbResult<GsbEntityDef>;

    async fn enumeration(&self, name: &str) -> GsbResult<GsbEnum>;
}

/// Build one column per property, in display order
pub async fn build_columns<L>(entity_def: &GsbEntityDef, lookup: &L) -> Vec<ColumnDef>
where
    L: DefinitionLookup + ?Sized,
{
    let mut columns = Vec::with_capacity(entity_def.properties.len());
    for property in entity_def.ordered_properties() {
        columns.push(build_column(property, lookup).await);
    }
    debug!(
        entity_def = %entity_def.name,
        columns = columns.len(),
        "Built grid columns"
    );
    columns
}

/// Build the column for a single property
pub async fn build_column<L>(property: &GsbProperty, lookup: &L) -> ColumnDef
where
    L: DefinitionLookup + ?Sized,
{
    let column = ColumnDef::for_property(property, kind_for_property(property));

    match property.data_type() {
        GsbDataType::Enum => with_enum_values(column, property, lookup).await,
        GsbDataType::Reference => with_reference_target(column, property, lookup).await,
        _ => column,
    }
}

async fn with_enum_values<L>(mut column: ColumnDef, property: &GsbProperty, lookup: &L) -> ColumnDef
where
    L: DefinitionLookup + ?Sized,
{
    let Some(enum_name) = property.enum_name.as_deref() else {
        warn!(property = %property.name, "Enum property without enum name, rendering raw values");
        return column.with_raw_rendering();
    };

    match lookup.enumeration(enum_name).await {
        Ok(gsb_enum) => {
            column.enum_values = gsb_enum.values;
            column
        }
        Err(e) => {
            warn!(
                property = %property.name,
                enum_name,
                error = %e,
                "Failed to load enum, rendering raw values"
            );
            column.with_raw_rendering()
        }
    }
}

async fn with_reference_target<L>(
    mut column: ColumnDef,
    property: &GsbProperty,
    lookup: &L,
) -> ColumnDef
where
    L: DefinitionLookup + ?Sized,
{
    let Some(target) = property.ref_target() else {
        warn!(property = %property.name, "Reference property without target, rendering raw values");
        return column.with_raw_rendering();
    };

    match lookup.entity_def(target).await {
        Ok(target_def) => {
            column.ref_display_prop = display_prop(&target_def);
            column
        }
        Err(e) => {
            warn!(
                property = %property.name,
                target,
                error = %e,
                "Failed to load reference target, rendering raw values"
            );
            column.with_raw_rendering()
        }
    }
}

/// Property used to label entities of a definition
pub fn display_prop(entity_def: &GsbEntityDef) -> Option<String> {
    DISPLAY_PROP_CANDIDATES
        .iter()
        .find_map(|candidate| entity_def.property_ignore_case(candidate))
        .or_else(|| {
            entity_def
                .listed_properties()
                .into_iter()
                .find(|p| p.data_type() == GsbDataType::String)
        })
        .map(|p| p.name.clone())
}
