//! Parent selection and the staleness guard for child fetches.
//!
//! DESIGN
//! ======
//! Each collection remembers the value chosen in its dropdown and a fetch
//! generation. Choosing a parent bumps the generation of every collection
//! whose displayed set depends on it and hands out a `ChildRequest` stamped
//! with the new generation. A response is applied only while its stamp
//! still matches the collection's generation and chosen parent; anything
//! older is stale and dropped whole.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::sync::Arc;

use serde_json::Value;

use crate::error::RegistryError;
use crate::model::entity::EntityId;
use crate::net::backend::Backend;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub chosen: Option<EntityId>,
    pub generation: u64,
}

impl Selection {
    /// Invalidate in-flight fetches and return the new generation.
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Outcome of applying a child fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The response matched the current selection and was applied.
    Fresh,
    /// A newer selection superseded the request; nothing changed.
    Stale,
}

/// A pending child fetch. `send` performs it without touching the registry,
/// so several requests may be in flight while the selection keeps moving.
pub struct ChildRequest {
    pub collection: String,
    pub parent: Option<EntityId>,
    pub generation: u64,
    resource: Option<String>,
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for ChildRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildRequest")
            .field("collection", &self.collection)
            .field("parent", &self.parent)
            .field("generation", &self.generation)
            .field("fetch", &self.resource.is_some())
            .finish_non_exhaustive()
    }
}

impl ChildRequest {
    /// `resource` is `None` when nothing needs fetching (no parent chosen, or
    /// the child collection is already loaded).
    pub(crate) fn new(
        collection: &str,
        parent: Option<EntityId>,
        generation: u64,
        resource: Option<String>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self { collection: collection.to_owned(), parent, generation, resource, backend }
    }

    #[must_use]
    pub fn needs_fetch(&self) -> bool {
        self.resource.is_some()
    }

    pub async fn send(self) -> ChildResponse {
        let result = match &self.resource {
            Some(resource) => Some(self.backend.list(resource).await),
            None => None,
        };
        ChildResponse { collection: self.collection, parent: self.parent, generation: self.generation, result }
    }
}

/// A resolved child fetch, or a no-op ticket when nothing was fetched.
#[derive(Debug)]
pub struct ChildResponse {
    pub collection: String,
    pub parent: Option<EntityId>,
    pub generation: u64,
    pub result: Option<Result<Value, RegistryError>>,
}
