//! Preset queries
//!
//! Queries the client builds on its own behalf: lookups by id or name and
//! the metadata queries behind definition and enum loading.

use gsb_core::pagination::PageWindow;
use gsb_models::entity::ID_FIELD;
use gsb_models::entity_def::ENTITY_DEF_ENTITY;
use gsb_models::enums::ENUM_ENTITY;

use crate::query_params::QueryParams;

/// Predicate name used by the lookups below
pub const LOOKUP_QUERY_NAME: &str = "lookup";

/// Fetch one entity by id
pub fn by_id(ent_def_name: &str, id: &str) -> QueryParams {
    single(ent_def_name, ID_FIELD, id)
}

/// Fetch one entity by its `name` property
pub fn by_name(ent_def_name: &str, name: &str) -> QueryParams {
    single(ent_def_name, "name", name)
}

/// Fetch an entity definition through the generic entity query
pub fn entity_def_by_name(name: &str) -> QueryParams {
    by_name(ENTITY_DEF_ENTITY, name)
}

/// Fetch an enum together with its values
pub fn enum_by_name(name: &str) -> QueryParams {
    let mut query = by_name(ENUM_ENTITY, name);
    query.include("values");
    query
}

/// First page of an entity list, newest first, with a total count
pub fn first_page(ent_def_name: &str, per_page: u32) -> QueryParams {
    QueryParams::new(ent_def_name)
        .sort_desc("createDate")
        .page(PageWindow::from_page(1, per_page))
        .with_total_count(true)
        .build()
}

fn single(ent_def_name: &str, prop_name: &str, value: &str) -> QueryParams {
    QueryParams::new(ent_def_name)
        .where_named(
            LOOKUP_QUERY_NAME,
            prop_name,
            value,
            crate::single_query::QueryFunction::Equals,
        )
        .page(PageWindow::new(0, 1))
        .build()
}
