//! # gsb-queries
//!
//! Query parameters for the GSB platform.
//!
//! Every list, lookup and grid in the admin console talks to the server
//! through a [`QueryParams`] body: predicates, projections, sorting, paging
//! and nested includes for reference properties.
//!
//! ## Structure
//!
//! - `single_query` - Predicates and comparison functions
//! - `select_col` - Column projections and aggregates
//! - `sorts` - Sort columns and directions
//! - `query_params` - The query body and its fluent builder
//! - `presets` - Queries the client issues on its own behalf
//!
//! ## Example
//!
//! ```
//! use gsb_queries::{presets, QueryParams, SingleQuery, SortDirection};
//!
//! let mut query = QueryParams::new("Customer");
//! query
//!     .where_query(SingleQuery::any([
//!         SingleQuery::contains("name", "acme"),
//!         SingleQuery::contains("email", "acme"),
//!     ]))
//!     .sort_by("name", SortDirection::Asc);
//!
//! assert!(query.has_filters());
//!
//! let lookup = presets::entity_def_by_name("Customer");
//! assert_eq!(lookup.count, Some(1));
//! ```

pub mod single_query;
pub mod select_col;
pub mod sorts;
pub mod query_params;
pub mod presets;

pub use single_query::{QueryFunction, QueryRelation, SingleQuery};
pub use select_col::{AggFunction, SelectCol};
pub use sorts::{parse_sort_list, SortCol, SortDirection};
pub use query_params::{IncludeQuery, QueryParams};
