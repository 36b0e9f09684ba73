//! # gsb-client
//!
//! Typed client for the GSB platform API.
//!
//! ```no_run
//! use gsb_client::GsbClient;
//! use gsb_core::config::ClientConfig;
//! use gsb_queries::QueryParams;
//!
//! # async fn example() -> gsb_core::GsbResult<()> {
//! let client = GsbClient::new(ClientConfig::load(Some("gsb.toml"))?)?;
//!
//! let mut query = QueryParams::new("Order");
//! query.where_eq("status", "open").sort_desc("createDate");
//! let orders = client.entities().query(&query).await?;
//! println!("{} open orders", orders.total());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod name_check;
pub mod services;
pub mod transport;

pub use cache::GsbCacheService;
pub use client::GsbClient;
pub use name_check::{check_property_name, NameCheck, NameChecker};
pub use services::{AuthService, EntityDefService, EntityService, WorkflowService};
pub use transport::{ApiRequest, ApiTransport, HttpTransport};
