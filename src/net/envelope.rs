//! Response-shape adapter for the backend boundary.
//!
//! DESIGN
//! ======
//! Backends answer list calls with a raw array, `{data: [...]}`,
//! `{items: [...]}`, or paginated `{results: [...], count}`. Single-record
//! responses come back raw or wrapped in `{data: {...}}`. Rejections carry a
//! field-to-messages map, or sometimes just `detail`/`error`. All of that is
//! flattened here so nothing past this module inspects response shapes.

#[cfg(test)]
#[path = "envelope_test.rs"]
mod envelope_test;

use serde_json::Value;

use crate::error::RegistryError;

/// Message used when a rejection body has no recognizable text.
pub const GENERIC_REJECTION: &str = "request rejected";

const LIST_KEYS: [&str; 3] = ["data", "items", "results"];
const TOTAL_KEYS: [&str; 3] = ["total", "totalRows", "count"];
const DETAIL_KEYS: [&str; 3] = ["detail", "error", "message"];

/// Canonical list payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub total: usize,
}

/// Normalize any list response to `{ items, total }`.
///
/// # Errors
///
/// Returns [`RegistryError::Decode`] when no list can be found in the body.
pub fn page(body: Value) -> Result<Page, RegistryError> {
    match body {
        Value::Null => Ok(Page::default()),
        Value::Array(items) => {
            let total = items.len();
            Ok(Page { items, total })
        }
        Value::Object(mut map) => {
            let Some(items) = LIST_KEYS
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
            else {
                return Err(RegistryError::Decode("list response without an item array".to_owned()));
            };
            let total = TOTAL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_u64))
                .map(|total| usize::try_from(total).unwrap_or(usize::MAX))
                .unwrap_or(items.len());
            Ok(Page { items, total })
        }
        other => Err(RegistryError::Decode(format!("list response is not a list: {other}"))),
    }
}

/// Extract the record from a create/update response, if it carries one.
///
/// A body counts as a record when it has an `id` or `pk`; otherwise a
/// `data` object with an `id`/`pk` is unwrapped. Anything else (empty body,
/// `{message: "..."}`) yields `None`.
#[must_use]
pub fn single(body: Value) -> Option<Value> {
    let Value::Object(mut map) = body else {
        return None;
    };
    if has_identity(&map) {
        return Some(Value::Object(map));
    }
    match map.remove("data") {
        Some(Value::Object(inner)) if has_identity(&inner) => Some(Value::Object(inner)),
        _ => None,
    }
}

fn has_identity(map: &serde_json::Map<String, Value>) -> bool {
    map.contains_key("id") || map.contains_key("pk")
}

/// First message of the first offending field in a validation payload
/// (`{"name": ["already exists"]}`), or `None` when the body is not that
/// shape.
#[must_use]
pub fn field_rejection(body: &Value) -> Option<String> {
    let Value::Object(map) = body else {
        return None;
    };
    map.iter()
        .filter(|(key, _)| !DETAIL_KEYS.contains(&key.as_str()))
        .find_map(|(_, value)| first_message(value))
}

/// Free-text detail from an error body (`detail`, `error`, `message`).
#[must_use]
pub fn detail_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => DETAIL_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(first_message)),
        Value::Array(_) => first_message(body),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        _ => None,
    }
}

/// Best user-facing text for a rejection body, falling back to
/// [`GENERIC_REJECTION`].
#[must_use]
pub fn rejection_message(body: &Value) -> String {
    field_rejection(body)
        .or_else(|| detail_message(body))
        .unwrap_or_else(|| GENERIC_REJECTION.to_owned())
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Array(messages) => messages.iter().find_map(first_message),
        _ => None,
    }
}
