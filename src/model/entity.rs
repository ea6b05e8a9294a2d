//! Canonical reference-data record.
//!
//! DESIGN
//! ======
//! Backends disagree on field names and on how `status` is encoded. Those
//! differences stop at the schema boundary; everything past it sees one
//! `Entity` shape with a boolean status and an optional parent id.

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// ENTITY ID
// =============================================================================

/// Backend-assigned identifier. Immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Read an id from a JSON number, a numeric string, or an object
    /// carrying `id`/`pk` (nested foreign keys).
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_i64().map(Self),
            Value::String(raw) => match raw.trim().parse::<i64>() {
                Ok(id) => Some(Self(id)),
                Err(_) => None,
            },
            Value::Object(map) => map.get("id").or_else(|| map.get("pk")).and_then(Self::from_value),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).ok_or_else(|| D::Error::custom(format!("invalid entity id: {value}")))
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Normalize a backend status value to the canonical boolean.
///
/// Accepts `true/false`, `1/0`, and their string spellings plus
/// `"active"`/`"inactive"`. `null` counts as absent. Returns `None` for
/// anything else.
#[must_use]
pub fn normalize_status(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "active" => Some(true),
            "false" | "0" | "inactive" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Badge text shown next to a record.
#[must_use]
pub fn status_badge(status: bool) -> &'static str {
    if status { "Active" } else { "Inactive" }
}

// =============================================================================
// ENTITY
// =============================================================================

/// A single reference-data record (bank, state, department, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub label: String,
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    /// Backend fields the canonical model does not name (ancestor refs,
    /// codes, descriptions). Carried through full updates untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Entity {
    #[must_use]
    pub fn new(id: EntityId, label: impl Into<String>) -> Self {
        Self { id, label: label.into(), status: true, parent: None, extra: Map::new() }
    }

    #[must_use]
    pub fn under(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    /// Draft fields pre-filled from this record, as an edit form would be.
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        Fields {
            label: self.label.clone(),
            status: Some(self.status),
            parent: self.parent,
            extra: self.extra.clone(),
        }
    }
}

// =============================================================================
// FIELDS
// =============================================================================

/// Draft input for add/edit. `status: None` means "keep" on edit and
/// "active" on add.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields {
    pub label: String,
    pub status: Option<bool>,
    pub parent: Option<EntityId>,
    pub extra: Map<String, Value>,
}

impl Fields {
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    #[must_use]
    pub fn under(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.extra.insert(field.into(), value);
        self
    }
}
