//! Local copy of one collection's entities.
//!
//! DESIGN
//! ======
//! Rows keep backend order. Mutations are minimal: an add appends one row,
//! an edit or toggle replaces one row in place, a delete drops one row.
//! Nothing here talks to the backend.

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;

use serde::Serialize;

use crate::model::entity::{Entity, EntityId};

/// Active/inactive counts for a collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    entities: Vec<Entity>,
}

impl Collection {
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn replace_all(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    #[must_use]
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id == id)
    }

    /// Replace the row with the same id, or append when absent.
    pub fn upsert(&mut self, entity: Entity) {
        match self.position(entity.id) {
            Some(index) => self.entities[index] = entity,
            None => self.entities.push(entity),
        }
    }

    /// Replace an existing row in place. Returns `false` when absent.
    pub fn replace(&mut self, entity: Entity) -> bool {
        match self.position(entity.id) {
            Some(index) => {
                self.entities[index] = entity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.position(id).map(|index| self.entities.remove(index))
    }

    /// Set one row's status. Returns `false` when absent.
    pub fn set_status(&mut self, id: EntityId, status: bool) -> bool {
        match self.entities.iter_mut().find(|entity| entity.id == id) {
            Some(entity) => {
                entity.status = status;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CollectionStats {
        let active = self.entities.iter().filter(|entity| entity.status).count();
        CollectionStats { total: self.entities.len(), active, inactive: self.entities.len() - active }
    }
}
