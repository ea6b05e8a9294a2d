//! Canonical record model and declarative resource schemas.
//!
//! SYSTEM CONTEXT
//! ==============
//! `entity` defines what the registry stores; `schema` translates between
//! that and each backend resource's field names.

pub mod entity;
pub mod schema;
