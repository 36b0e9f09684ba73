//! Query parameters
//!
//! `QueryParams` is the request body of every GSB query endpoint. It is built
//! fresh for each interaction, posted once and dropped. The fluent methods
//! mutate in place and hand back `&mut Self` so calls chain:
//!
//! ```
//! use gsb_queries::{QueryFunction, QueryParams, SortDirection};
//!
//! let mut query = QueryParams::new("Order");
//! query
//!     .where_prop("status", "open", QueryFunction::Equals)
//!     .select(["number", "customer.name"])
//!     .sort_by("createDate", SortDirection::Desc);
//!
//! assert_eq!(query.query.len(), 1);
//! ```
//!
//! Nothing is validated locally: unknown properties surface as server errors.

use gsb_core::pagination::PageWindow;
use gsb_core::traits::Id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::select_col::SelectCol;
use crate::single_query::{QueryFunction, SingleQuery};
use crate::sorts::{SortCol, SortDirection};

fn is_false(b: &bool) -> bool {
    !*b
}

/// Nested sub-query applied to a reference property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludeQuery {
    /// Reference property whose targets are loaded
    pub prop_name: String,
    pub query: QueryParams,
}

/// A complete query against one entity definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ent_def_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ent_def_id: Option<Id>,

    /// Predicates, combined with AND
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<SingleQuery>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select_cols: Vec<SelectCol>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_cols: Vec<SortCol>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Ask the server for the total row count
    #[serde(default, skip_serializing_if = "is_false")]
    pub calc_total_count: bool,

    /// Free-text filter applied across searchable properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(default, rename = "incS", skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<IncludeQuery>,
}

impl QueryParams {
    /// Query an entity definition by name
    pub fn new(ent_def_name: impl Into<String>) -> Self {
        Self {
            ent_def_name: Some(ent_def_name.into()),
            ..Default::default()
        }
    }

    /// Query an entity definition by id
    pub fn for_ent_def_id(ent_def_id: impl Into<Id>) -> Self {
        Self {
            ent_def_id: Some(ent_def_id.into()),
            ..Default::default()
        }
    }

    /// A sub-query without a target, for use with [`QueryParams::inc_s`]
    pub fn sub() -> Self {
        Self::default()
    }

    // Predicates

    /// Append a predicate
    pub fn where_prop(
        &mut self,
        prop_name: impl Into<String>,
        value: impl Into<Value>,
        function: QueryFunction,
    ) -> &mut Self {
        self.query.push(SingleQuery::new(prop_name, value, function));
        self
    }

    /// Append a named predicate, replacing an earlier one with the same name
    pub fn where_named(
        &mut self,
        query_name: impl Into<String>,
        prop_name: impl Into<String>,
        value: impl Into<Value>,
        function: QueryFunction,
    ) -> &mut Self {
        self.where_query(SingleQuery::new(prop_name, value, function).named(query_name))
    }

    /// Append a prepared predicate; a named one replaces its namesake in place
    pub fn where_query(&mut self, query: SingleQuery) -> &mut Self {
        let existing = query
            .name
            .as_deref()
            .and_then(|name| self.query.iter().position(|q| q.has_name(name)));

        match existing {
            Some(pos) => self.query[pos] = query,
            None => self.query.push(query),
        }
        self
    }

    /// Shorthand for an equality predicate
    pub fn where_eq(&mut self, prop_name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.where_prop(prop_name, value, QueryFunction::Equals)
    }

    /// Remove a named predicate, returning whether one was present
    pub fn remove_where(&mut self, query_name: &str) -> bool {
        let before = self.query.len();
        self.query.retain(|q| !q.has_name(query_name));
        self.query.len() != before
    }

    /// Keep only predicates matching the condition
    pub fn retain_where(&mut self, keep: impl FnMut(&SingleQuery) -> bool) -> &mut Self {
        self.query.retain(keep);
        self
    }

    pub fn clear_where(&mut self) -> &mut Self {
        self.query.clear();
        self
    }

    pub fn predicate(&self, query_name: &str) -> Option<&SingleQuery> {
        self.query.iter().find(|q| q.has_name(query_name))
    }

    pub fn has_predicate(&self, query_name: &str) -> bool {
        self.predicate(query_name).is_some()
    }

    /// Predicates on a given property
    pub fn predicates_for(&self, prop_name: &str) -> Vec<&SingleQuery> {
        self.query
            .iter()
            .filter(|q| q.prop_name.as_deref() == Some(prop_name))
            .collect()
    }

    // Projections

    /// Append plain projections, skipping columns already selected
    pub fn select<I, S>(&mut self, prop_names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for prop_name in prop_names {
            self.select_col(SelectCol::new(prop_name));
        }
        self
    }

    /// Append a projection unless the same column is already selected
    pub fn select_col(&mut self, col: SelectCol) -> &mut Self {
        if !self.select_cols.iter().any(|c| c.same_column(&col)) {
            self.select_cols.push(col);
        }
        self
    }

    /// Drop every projection of a property, returning whether any existed
    pub fn deselect(&mut self, prop_name: &str) -> bool {
        let before = self.select_cols.len();
        self.select_cols.retain(|c| c.prop_name != prop_name);
        self.select_cols.len() != before
    }

    pub fn clear_select(&mut self) -> &mut Self {
        self.select_cols.clear();
        self
    }

    pub fn selects(&self, prop_name: &str) -> bool {
        self.select_cols.iter().any(|c| c.prop_name == prop_name)
    }

    pub fn selected_props(&self) -> Vec<&str> {
        self.select_cols.iter().map(|c| c.prop_name.as_str()).collect()
    }

    // Sorting

    /// Append a sort column, replacing an existing sort on the same property
    pub fn sort_by(&mut self, prop_name: impl Into<String>, direction: SortDirection) -> &mut Self {
        let col = SortCol::new(prop_name, direction);
        match self.sort_cols.iter_mut().find(|c| c.prop_name == col.prop_name) {
            Some(existing) => existing.direction = col.direction,
            None => self.sort_cols.push(col),
        }
        self
    }

    pub fn sort_asc(&mut self, prop_name: impl Into<String>) -> &mut Self {
        self.sort_by(prop_name, SortDirection::Asc)
    }

    pub fn sort_desc(&mut self, prop_name: impl Into<String>) -> &mut Self {
        self.sort_by(prop_name, SortDirection::Desc)
    }

    pub fn remove_sort(&mut self, prop_name: &str) -> bool {
        let before = self.sort_cols.len();
        self.sort_cols.retain(|c| c.prop_name != prop_name);
        self.sort_cols.len() != before
    }

    pub fn clear_sort(&mut self) -> &mut Self {
        self.sort_cols.clear();
        self
    }

    pub fn sorts_by(&self, prop_name: &str) -> bool {
        self.sort_cols.iter().any(|c| c.prop_name == prop_name)
    }

    // Includes

    /// Load the targets of a reference property with a sub-query
    ///
    /// A repeated include for the same property replaces the earlier one.
    pub fn inc_s(&mut self, prop_name: impl Into<String>, query: QueryParams) -> &mut Self {
        let include = IncludeQuery {
            prop_name: prop_name.into(),
            query,
        };
        match self
            .includes
            .iter_mut()
            .find(|i| i.prop_name == include.prop_name)
        {
            Some(existing) => *existing = include,
            None => self.includes.push(include),
        }
        self
    }

    /// Include a reference property with default columns
    pub fn include(&mut self, prop_name: impl Into<String>) -> &mut Self {
        self.inc_s(prop_name, QueryParams::sub())
    }

    pub fn include_for(&self, prop_name: &str) -> Option<&QueryParams> {
        self.includes
            .iter()
            .find(|i| i.prop_name == prop_name)
            .map(|i| &i.query)
    }

    // Paging and filtering

    pub fn page(&mut self, window: PageWindow) -> &mut Self {
        self.start_index = Some(window.start_index);
        self.count = Some(window.count);
        self
    }

    /// The requested window, if any
    pub fn window(&self) -> Option<PageWindow> {
        match (self.start_index, self.count) {
            (None, None) => None,
            (start, count) => Some(PageWindow::new(
                start.unwrap_or(0),
                count.unwrap_or(gsb_core::pagination::DEFAULT_PAGE_SIZE),
            )),
        }
    }

    pub fn unpaged(&mut self) -> &mut Self {
        self.start_index = None;
        self.count = None;
        self
    }

    pub fn with_total_count(&mut self, calc: bool) -> &mut Self {
        self.calc_total_count = calc;
        self
    }

    /// Set the free-text filter; blank text clears it
    pub fn filter_text(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        self.filter = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        self
    }

    /// Take a finished copy out of a chain of `&mut` calls
    pub fn build(&mut self) -> QueryParams {
        self.clone()
    }

    /// Entity definition reference for log fields
    pub fn target(&self) -> &str {
        self.ent_def_name
            .as_deref()
            .or(self.ent_def_id.as_deref())
            .unwrap_or("<unspecified>")
    }

    pub fn has_filters(&self) -> bool {
        !self.query.is_empty() || self.filter.is_some()
    }

    /// Check every predicate (and nested include) is complete
    pub fn is_valid(&self) -> bool {
        self.query.iter().all(|q| q.is_valid())
            && self.includes.iter().all(|i| i.query.is_valid())
    }
}
