//! In-process backend with REST semantics.
//!
//! Rows live in per-resource tables behind a `std::sync::Mutex`; ids are
//! assigned sequentially per resource. Unique label constraints and injected
//! failures reproduce the rejections a real server sends, so registry
//! behaviour can be exercised without a network.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value, json};

use super::backend::Backend;
use crate::error::RegistryError;
use crate::model::entity::EntityId;

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub resource: String,
    pub id: Option<EntityId>,
}

/// How write responses are shaped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteReply {
    /// The stored record, as most endpoints answer.
    #[default]
    Record,
    /// `{"data": record, "message": ...}`
    Wrapped,
    /// `{"message": ...}` with no record.
    Bare,
}

#[derive(Default)]
struct Tables {
    rows: HashMap<String, Vec<Map<String, Value>>>,
    next_id: HashMap<String, i64>,
    unique: HashMap<String, String>,
    failures: VecDeque<(Option<&'static str>, RegistryError)>,
    calls: Vec<Call>,
    write_reply: WriteReply,
    wrap_lists: bool,
}

#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Tables>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject creates and updates whose `field` duplicates another row.
    #[must_use]
    pub fn with_unique(self, resource: &str, field: &str) -> Self {
        self.lock().unique.insert(resource.to_owned(), field.to_owned());
        self
    }

    #[must_use]
    pub fn with_write_reply(self, reply: WriteReply) -> Self {
        self.lock().write_reply = reply;
        self
    }

    /// Answer list calls with `{"data": [...], "total": n}` instead of a raw array.
    #[must_use]
    pub fn with_wrapped_lists(self) -> Self {
        self.lock().wrap_lists = true;
        self
    }

    /// Insert rows as-is. Rows without an `id` get the next free one.
    pub fn seed(&self, resource: &str, rows: Vec<Value>) {
        let mut tables = self.lock();
        for row in rows {
            let Value::Object(mut map) = row else {
                continue;
            };
            let id = match map.get("id").and_then(EntityId::from_value) {
                Some(id) => {
                    let next = tables.next_id.entry(resource.to_owned()).or_insert(1);
                    *next = (*next).max(id.0 + 1);
                    id
                }
                None => {
                    let id = tables.allocate(resource);
                    map.insert("id".to_owned(), Value::from(id.0));
                    id
                }
            };
            tracing::trace!(resource, %id, "seeded row");
            tables.rows.entry(resource.to_owned()).or_default().push(map);
        }
    }

    /// Fail the next backend call with `err`. Queued failures fire in order.
    pub fn fail_next(&self, err: RegistryError) {
        self.lock().failures.push_back((None, err));
    }

    /// Fail the next call made with `method` (`"GET"`, `"POST"`, ...). Calls
    /// with other methods pass until it fires.
    pub fn fail_next_on(&self, method: &'static str, err: RegistryError) {
        self.lock().failures.push_back((Some(method), err));
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Snapshot of the stored rows for `resource`.
    #[must_use]
    pub fn rows(&self, resource: &str) -> Vec<Value> {
        self.lock()
            .rows
            .get(resource)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and pop an injected failure, if any.
    fn enter(&self, method: &'static str, resource: &str, id: Option<EntityId>) -> Result<MutexGuard<'_, Tables>, RegistryError> {
        let mut tables = self.lock();
        tables.calls.push(Call { method, resource: resource.to_owned(), id });
        let fires = tables
            .failures
            .front()
            .is_some_and(|(only, _)| only.is_none_or(|only| only == method));
        match fires.then(|| tables.failures.pop_front()).flatten() {
            Some((_, err)) => Err(err),
            None => Ok(tables),
        }
    }
}

impl Tables {
    fn allocate(&mut self, resource: &str) -> EntityId {
        let next = self.next_id.entry(resource.to_owned()).or_insert(1);
        let id = *next;
        *next += 1;
        EntityId(id)
    }

    fn position(&self, resource: &str, id: EntityId) -> Result<usize, RegistryError> {
        self.rows
            .get(resource)
            .and_then(|rows| {
                rows.iter()
                    .position(|row| row.get("id").and_then(EntityId::from_value) == Some(id))
            })
            .ok_or_else(|| RegistryError::Server { status: 404, message: "Not found.".to_owned() })
    }

    /// Unique-constraint check against every row except `skip`.
    fn check_unique(&self, resource: &str, row: &Map<String, Value>, skip: Option<EntityId>) -> Result<(), RegistryError> {
        let Some(field) = self.unique.get(resource) else {
            return Ok(());
        };
        let Some(candidate) = row.get(field).and_then(Value::as_str) else {
            return Ok(());
        };
        let clash = self.rows.get(resource).is_some_and(|rows| {
            rows.iter().any(|existing| {
                existing.get("id").and_then(EntityId::from_value) != skip
                    && existing
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|value| value.eq_ignore_ascii_case(candidate))
            })
        });
        if clash {
            let noun = resource.strip_suffix('s').unwrap_or(resource).replace('-', " ");
            let field_words = field.replace('_', " ");
            return Err(RegistryError::Conflict(format!("{noun} with this {field_words} already exists.")));
        }
        Ok(())
    }

    fn reply(&self, record: &Map<String, Value>, message: &str) -> Value {
        match self.write_reply {
            WriteReply::Record => Value::Object(record.clone()),
            WriteReply::Wrapped => json!({ "message": message, "data": record }),
            WriteReply::Bare => json!({ "message": message }),
        }
    }
}

fn object(body: &Value) -> Result<Map<String, Value>, RegistryError> {
    match body {
        Value::Object(map) => Ok(map.clone()),
        other => Err(RegistryError::Server { status: 400, message: format!("expected an object body, got {other}") }),
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn list(&self, resource: &str) -> Result<Value, RegistryError> {
        let tables = self.enter("GET", resource, None)?;
        let items: Vec<Value> = tables
            .rows
            .get(resource)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default();
        if tables.wrap_lists {
            let total = items.len();
            return Ok(json!({ "data": items, "total": total }));
        }
        Ok(Value::Array(items))
    }

    async fn create(&self, resource: &str, body: &Value) -> Result<Value, RegistryError> {
        let mut tables = self.enter("POST", resource, None)?;
        let mut row = object(body)?;
        tables.check_unique(resource, &row, None)?;
        let id = tables.allocate(resource);
        row.insert("id".to_owned(), Value::from(id.0));
        let reply = tables.reply(&row, "created");
        tables.rows.entry(resource.to_owned()).or_default().push(row);
        Ok(reply)
    }

    async fn update(&self, resource: &str, id: EntityId, body: &Value) -> Result<Value, RegistryError> {
        let mut tables = self.enter("PUT", resource, Some(id))?;
        let index = tables.position(resource, id)?;
        let mut row = object(body)?;
        tables.check_unique(resource, &row, Some(id))?;
        row.insert("id".to_owned(), Value::from(id.0));
        let reply = tables.reply(&row, "updated");
        if let Some(rows) = tables.rows.get_mut(resource) {
            rows[index] = row;
        }
        Ok(reply)
    }

    async fn patch(&self, resource: &str, id: EntityId, body: &Value) -> Result<Value, RegistryError> {
        let mut tables = self.enter("PATCH", resource, Some(id))?;
        let index = tables.position(resource, id)?;
        let changes = object(body)?;
        let Some(rows) = tables.rows.get_mut(resource) else {
            return Err(RegistryError::Server { status: 404, message: "Not found.".to_owned() });
        };
        let row = &mut rows[index];
        for (field, value) in changes {
            row.insert(field, value);
        }
        let row = row.clone();
        Ok(tables.reply(&row, "updated"))
    }

    async fn delete(&self, resource: &str, id: EntityId) -> Result<(), RegistryError> {
        let mut tables = self.enter("DELETE", resource, Some(id))?;
        let index = tables.position(resource, id)?;
        if let Some(rows) = tables.rows.get_mut(resource) {
            rows.remove(index);
        }
        Ok(())
    }
}
