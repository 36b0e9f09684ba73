//! API services
//!
//! Thin request/response wrappers over [`GsbClient`](crate::GsbClient). No
//! business rules live here; the server validates everything.

pub mod auth;
pub mod entity;
pub mod entity_def;
pub mod workflow;

pub use auth::AuthService;
pub use entity::EntityService;
pub use entity_def::EntityDefService;
pub use workflow::WorkflowService;
