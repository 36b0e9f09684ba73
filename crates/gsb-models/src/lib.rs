//! # gsb-models
//!
//! Models for the data the GSB server hands out: entity definitions, their
//! properties and property types, enumerations, entity records and workflow
//! envelopes. Everything here is plain serde data; the server is the only
//! authority on validity.

pub mod data_type;
pub mod property;
pub mod entity_def;
pub mod enums;
pub mod entity;
pub mod workflow;
pub mod naming;

pub use data_type::GsbDataType;
pub use property::{EntDefRef, FormModes, GsbProperty, GsbPropertyDef, RefType};
pub use entity_def::GsbEntityDef;
pub use enums::{GsbEnum, GsbEnumValue};
pub use entity::{GsbEntity, QueryResult};
pub use workflow::{WorkflowAction, WorkflowRequest, WorkflowResponse};
pub use naming::{
    is_reserved_property_name, is_valid_name, to_camel_case, to_pascal_case, validate_name,
    validate_property_name,
};
