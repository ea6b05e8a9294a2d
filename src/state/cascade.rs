//! Cascading filter over a child collection.
//!
//! Always recomputed from the full collection and the selected parent,
//! never patched incrementally.

#[cfg(test)]
#[path = "cascade_test.rs"]
mod cascade_test;

use crate::model::entity::{Entity, EntityId};

/// Shown when a referenced parent is not in the local collection.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// `{ e in full | e.parent == parent }`. No parent selected yields nothing.
#[must_use]
pub fn cascade(full: &[Entity], parent: Option<EntityId>) -> Vec<Entity> {
    let Some(parent) = parent else {
        return Vec::new();
    };
    full.iter()
        .filter(|entity| entity.parent == Some(parent))
        .cloned()
        .collect()
}

/// Entities eligible as a dropdown option: active ones, in collection order.
#[must_use]
pub fn active_options(entities: &[Entity]) -> Vec<Entity> {
    entities.iter().filter(|entity| entity.status).cloned().collect()
}

#[must_use]
pub fn label_of(entities: &[Entity], id: EntityId) -> &str {
    entities
        .iter()
        .find(|entity| entity.id == id)
        .map_or(UNKNOWN_LABEL, |entity| entity.label.as_str())
}
