//! Registry error taxonomy and operation-scoped failure messages.
//!
//! ERROR HANDLING
//! ==============
//! Validation errors are raised before any backend call. Everything else is
//! caught at the operation boundary, turned into a user-facing message on the
//! affected collection, and returned to the caller. Nothing here is fatal and
//! nothing is retried.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::model::entity::EntityId;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Client-side field check failed; the backend was never called.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// Backend rejected the write as a duplicate or unique-constraint breach.
    #[error("{0}")]
    Conflict(String),

    /// The referenced entity is not in the local collection.
    #[error("{collection} {id} not found")]
    NotFound { collection: String, id: EntityId },

    /// Transport-level failure (connect, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response without a recognized validation payload.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// A 2xx response whose body could not be mapped to the canonical model.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// The resource catalog is inconsistent (dangling parent, cycle, ...).
    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("config parse failed: {0}")]
    Config(String),
}

impl RegistryError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn not_found(collection: &str, id: EntityId) -> Self {
        Self::NotFound { collection: collection.to_owned(), id }
    }
}

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code for structured log fields.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

impl ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "E_VALIDATION",
            Self::Conflict(_) => "E_CONFLICT",
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::Network(_) => "E_NETWORK",
            Self::Server { .. } => "E_SERVER",
            Self::Decode(_) => "E_DECODE",
            Self::UnknownCollection(_) => "E_UNKNOWN_COLLECTION",
            Self::Schema(_) => "E_SCHEMA",
            Self::Config(_) => "E_CONFIG",
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// The registry operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    SelectParent,
    Add,
    Edit,
    Remove,
    ToggleStatus,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::SelectParent => "select_parent",
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Remove => "remove",
            Self::ToggleStatus => "toggle_status",
        }
    }

    /// User-facing message for a failed operation on a collection whose
    /// singular noun is `noun` (e.g. `"location"`).
    ///
    /// Validation failures show the field message verbatim; everything else
    /// is prefixed so "add failed", "delete failed" and "status update
    /// failed" stay distinguishable.
    #[must_use]
    pub fn failure_message(self, noun: &str, err: &RegistryError) -> String {
        if let RegistryError::Validation { message, .. } = err {
            return message.clone();
        }
        let action = match self {
            Self::Load => format!("Failed to fetch {noun} list"),
            Self::SelectParent => format!("Failed to load {noun} options"),
            Self::Add => format!("Failed to add {noun}"),
            Self::Edit => format!("Failed to update {noun}"),
            Self::Remove => format!("Failed to delete {noun}"),
            Self::ToggleStatus => format!("Failed to update {noun} status"),
        };
        format!("{action}: {err}")
    }
}
