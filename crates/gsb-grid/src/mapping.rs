//! Grid state <-> query translation
//!
//! Grid events (column toggles, sort and filter changes, block requests)
//! are folded into a [`QueryParams`]; an existing query can be turned back
//! into grid state. Predicates the grid owns are named `grid:<colId>`, so
//! predicates added by other code survive every filter change.

use std::collections::BTreeMap;

use gsb_core::pagination::PageWindow;
use gsb_queries::{QueryParams, SelectCol, SortDirection};
use serde::{Deserialize, Serialize};

use crate::column::{ColumnDef, ColumnFilter};
use crate::filter_model::ColumnFilterModel;

/// Name prefix of grid-owned predicates
pub const GRID_QUERY_PREFIX: &str = "grid:";

/// Filter model of a whole grid, keyed by column id
pub type FilterModel = BTreeMap<String, ColumnFilterModel>;

/// Query name of the predicate owned by a column's filter
pub fn grid_query_name(col_id: &str) -> String {
    format!("{}{}", GRID_QUERY_PREFIX, col_id)
}

/// Column id of a grid-owned predicate name
pub fn grid_col_id(query_name: &str) -> Option<&str> {
    query_name.strip_prefix(GRID_QUERY_PREFIX)
}

/// A column shown or hidden by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnToggle {
    pub property_name: String,
    pub visible: bool,
}

impl ColumnToggle {
    pub fn show(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            visible: true,
        }
    }

    pub fn hide(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            visible: false,
        }
    }
}

/// One entry of the grid's sort model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModelItem {
    pub col_id: String,
    pub sort: SortDirection,
    /// Position among sorted columns; absent entries keep their list order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<u32>,
}

impl SortModelItem {
    pub fn new(col_id: impl Into<String>, sort: SortDirection) -> Self {
        Self {
            col_id: col_id.into(),
            sort,
            sort_index: None,
        }
    }
}

/// Grid state derived from a query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    /// Selected columns in query order; empty means every column
    pub visible_columns: Vec<String>,
    pub sort_model: Vec<SortModelItem>,
    pub filter_model: FilterModel,
}

/// Apply column visibility toggles to the projection
///
/// Existing order is kept; shown columns are appended at the end.
pub fn apply_visibility(query: &mut QueryParams, toggles: &[ColumnToggle]) {
    for toggle in toggles {
        if toggle.visible {
            query.select_col(SelectCol::new(toggle.property_name.as_str()));
        } else {
            query.deselect(&toggle.property_name);
        }
    }
}

/// Replace the sort columns with the grid's sort model
pub fn apply_sort_model(query: &mut QueryParams, sort_model: &[SortModelItem]) {
    let mut ordered: Vec<(usize, &SortModelItem)> = sort_model.iter().enumerate().collect();
    ordered.sort_by_key(|(pos, item)| (item.sort_index.unwrap_or(u32::MAX), *pos));

    query.clear_sort();
    for (_, item) in ordered {
        query.sort_by(item.col_id.as_str(), item.sort);
    }
}

/// Replace the grid-owned predicates with the grid's filter model
pub fn apply_filter_model(query: &mut QueryParams, filter_model: &FilterModel) {
    query.retain_where(|q| {
        q.name
            .as_deref()
            .map(|name| grid_col_id(name).is_none())
            .unwrap_or(true)
    });

    for (col_id, model) in filter_model {
        if let Some(predicate) = model.to_query(col_id) {
            query.where_query(predicate.named(grid_query_name(col_id)));
        }
    }
}

/// Apply a grid block request `[start_row, end_row)`
pub fn apply_block(query: &mut QueryParams, start_row: u32, end_row: u32) -> PageWindow {
    let window = PageWindow::from_rows(start_row, end_row);
    query.page(window).with_total_count(true);
    window
}

/// Last row index to report back to the grid, when known
///
/// A server total wins; otherwise a short block marks the end.
pub fn last_row(window: PageWindow, returned: usize, total: Option<u64>) -> Option<u64> {
    match total {
        Some(total) => Some(total),
        None if (returned as u64) < u64::from(window.count) => {
            Some(u64::from(window.start_index) + returned as u64)
        }
        None => None,
    }
}

/// Derive grid state from a query
///
/// Column defs shape the filter widgets; predicates on unknown columns are
/// read as text filters.
pub fn grid_state_from_query(query: &QueryParams, columns: &[ColumnDef]) -> GridState {
    let widget_for = |col_id: &str| {
        columns
            .iter()
            .find(|c| c.col_id == col_id)
            .map(|c| c.kind.filter)
            .unwrap_or(ColumnFilter::Text)
    };

    let filter_model = query
        .query
        .iter()
        .filter_map(|q| {
            let col_id = grid_col_id(q.name.as_deref()?)?;
            let model = ColumnFilterModel::from_query(q, widget_for(col_id))?;
            Some((col_id.to_string(), model))
        })
        .collect();

    GridState {
        visible_columns: query.selected_props().into_iter().map(str::to_string).collect(),
        sort_model: query
            .sort_cols
            .iter()
            .enumerate()
            .map(|(i, col)| SortModelItem {
                col_id: col.prop_name.clone(),
                sort: col.direction,
                sort_index: Some(i as u32),
            })
            .collect(),
        filter_model,
    }
}

/// Hide columns not selected by the query; no projection shows everything
pub fn apply_state_to_columns(columns: &mut [ColumnDef], state: &GridState) {
    if state.visible_columns.is_empty() {
        return;
    }
    for column in columns.iter_mut() {
        column.hide = !state.visible_columns.contains(&column.col_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnKind;
    use crate::filter_model::{ConditionFilter, FilterCondition, SetFilter};
    use crate::lookup::kind_for_property;
    use gsb_models::{GsbDataType, GsbProperty};
    use gsb_queries::{SingleQuery, SortCol};
    use serde_json::json;

    fn column(name: &str, data_type: GsbDataType) -> ColumnDef {
        let prop = GsbProperty::new(name, data_type);
        let kind: ColumnKind = kind_for_property(&prop);
        ColumnDef::for_property(&prop, kind)
    }

    #[test]
    fn test_toggle_off_then_on_restores_once() {
        let mut query = QueryParams::new("Order");
        query.select(["number", "customer", "amount"]);

        apply_visibility(&mut query, &[ColumnToggle::hide("customer")]);
        assert_eq!(query.selected_props(), vec!["number", "amount"]);

        apply_visibility(
            &mut query,
            &[ColumnToggle::show("customer"), ColumnToggle::show("customer")],
        );
        assert_eq!(query.selected_props(), vec!["number", "amount", "customer"]);
    }

    #[test]
    fn test_visibility_keeps_existing_order() {
        let mut query = QueryParams::new("Order");
        query.select(["a", "b", "c"]);
        apply_visibility(&mut query, &[ColumnToggle::show("b"), ColumnToggle::show("d")]);
        assert_eq!(query.selected_props(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_sort_model_respects_sort_index() {
        let mut query = QueryParams::new("Order");
        query.sort_asc("legacy");

        let model = vec![
            SortModelItem {
                col_id: "amount".into(),
                sort: SortDirection::Desc,
                sort_index: Some(1),
            },
            SortModelItem {
                col_id: "number".into(),
                sort: SortDirection::Asc,
                sort_index: Some(0),
            },
        ];
        apply_sort_model(&mut query, &model);

        assert_eq!(
            query.sort_cols,
            vec![SortCol::asc("number"), SortCol::desc("amount")]
        );
    }

    #[test]
    fn test_filter_model_preserves_foreign_predicates() {
        let mut query = QueryParams::new("Order");
        query.where_query(SingleQuery::equals("tenantScope", "eu").named("scope"));
        query.where_eq("archived", false);

        let mut model = FilterModel::new();
        model.insert(
            "number".into(),
            ColumnFilterModel::Text(ConditionFilter::new(FilterCondition::Contains, "A-")),
        );
        apply_filter_model(&mut query, &model);
        assert_eq!(query.query.len(), 3);
        assert!(query.has_predicate("grid:number"));

        apply_filter_model(&mut query, &FilterModel::new());
        assert_eq!(query.query.len(), 2);
        assert!(query.has_predicate("scope"));
        assert!(!query.has_predicate("grid:number"));
    }

    #[test]
    fn test_filter_model_replaces_same_column() {
        let mut query = QueryParams::new("Order");
        let mut model = FilterModel::new();
        model.insert(
            "amount".into(),
            ColumnFilterModel::Number(ConditionFilter::new(FilterCondition::GreaterThan, 10)),
        );
        apply_filter_model(&mut query, &model);

        model.insert(
            "amount".into(),
            ColumnFilterModel::Number(ConditionFilter::new(FilterCondition::LessThan, 5)),
        );
        apply_filter_model(&mut query, &model);

        assert_eq!(query.query.len(), 1);
        assert_eq!(query.predicate("grid:amount").unwrap().value, json!(5));
    }

    #[test]
    fn test_block_request_and_last_row() {
        let mut query = QueryParams::new("Order");
        let window = apply_block(&mut query, 100, 200);
        assert_eq!(query.start_index, Some(100));
        assert_eq!(query.count, Some(100));
        assert!(query.calc_total_count);

        assert_eq!(last_row(window, 100, Some(1234)), Some(1234));
        assert_eq!(last_row(window, 40, None), Some(140));
        assert_eq!(last_row(window, 100, None), None);
    }

    #[test]
    fn test_grid_state_from_query() {
        let columns = vec![
            column("number", GsbDataType::String),
            column("amount", GsbDataType::Decimal),
            column("status", GsbDataType::Enum),
        ];

        let mut query = QueryParams::new("Order");
        query
            .select(["number", "amount"])
            .sort_desc("amount")
            .where_query(SingleQuery::greater_than("amount", 10).named("grid:amount"))
            .where_query(SingleQuery::in_values("status", [1, 2]).named("grid:status"))
            .where_query(SingleQuery::equals("archived", false).named("scope"));

        let state = grid_state_from_query(&query, &columns);
        assert_eq!(state.visible_columns, vec!["number", "amount"]);
        assert_eq!(state.sort_model, vec![SortModelItem {
            col_id: "amount".into(),
            sort: SortDirection::Desc,
            sort_index: Some(0),
        }]);
        assert_eq!(state.filter_model.len(), 2);
        assert!(matches!(
            state.filter_model.get("amount"),
            Some(ColumnFilterModel::Number(_))
        ));
        assert_eq!(
            state.filter_model.get("status"),
            Some(&ColumnFilterModel::Set(SetFilter::new(vec![json!(1), json!(2)])))
        );

        let mut cols = columns.clone();
        apply_state_to_columns(&mut cols, &state);
        assert!(cols[2].hide);
        assert!(!cols[0].hide);
    }

    #[test]
    fn test_round_trip_through_filter_model() {
        let columns = vec![column("createDate", GsbDataType::DateTime)];
        let mut model = FilterModel::new();
        model.insert(
            "createDate".into(),
            ColumnFilterModel::Date(ConditionFilter::date(
                FilterCondition::LessThan,
                "2024-06-30",
            )),
        );

        let mut query = QueryParams::new("Order");
        apply_filter_model(&mut query, &model);
        let state = grid_state_from_query(&query, &columns);
        assert_eq!(state.filter_model, model);
    }
}
