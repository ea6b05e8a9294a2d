//! Hierarchical reference registry.
//!
//! ARCHITECTURE
//! ============
//! One `Registry` owns the local copy of every collection in a `Catalog`,
//! the dropdown selection of each collection, and the edit session. Child
//! collections display `cascade(entities, chosen parent)`, recomputed from
//! scratch whenever either input changes.
//!
//! Mutations run the same three steps: client-side validation, one backend
//! call, then the minimal local change (append, in-place replace, remove or
//! status flip). A failed step leaves the collection as it was and records
//! an operation-specific message on it.
//!
//! CONCURRENCY
//! ===========
//! Operations take `&mut self`, so the registry is never mutated
//! concurrently. Child fetches are the exception: `begin_select_parent`
//! returns a `ChildRequest` that can be sent while the selection keeps
//! moving, and `apply_children` drops responses whose generation is no
//! longer current.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ErrorCode, Operation, RegistryError};
use crate::model::entity::{Entity, EntityId, Fields, normalize_status};
use crate::model::schema::{Catalog, ParentLink, ResourceSchema};
use crate::net::backend::Backend;
use crate::net::envelope;
use crate::state::cascade::{active_options, cascade, label_of};
use crate::state::collection::{Collection, CollectionStats};
use crate::state::query::{ListQuery, PageView};
use crate::state::selection::{Applied, ChildRequest, ChildResponse, Selection};

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Debug, Default)]
struct CollectionState {
    entities: Collection,
    displayed: Vec<Entity>,
    loaded: bool,
    loading: bool,
    error: Option<String>,
}

pub struct Registry {
    backend: Arc<dyn Backend>,
    catalog: Catalog,
    collections: HashMap<String, CollectionState>,
    selections: HashMap<String, Selection>,
    editing: Option<(String, EntityId)>,
}

impl Registry {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, catalog: Catalog) -> Self {
        let collections = catalog
            .iter()
            .map(|schema| (schema.key.clone(), CollectionState::default()))
            .collect();
        let selections = catalog
            .iter()
            .map(|schema| (schema.key.clone(), Selection::default()))
            .collect();
        Self { backend, catalog, collections, selections, editing: None }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

// =============================================================================
// LOAD + SELECT
// =============================================================================

impl Registry {
    /// Fetch the full collection and replace the local copy.
    ///
    /// Also invalidates any in-flight child fetch for `key`. A selection
    /// that no longer exists after the reload is cleared along with
    /// everything downstream of it.
    ///
    /// # Errors
    ///
    /// Any backend or decode error. The previous collection is kept.
    pub async fn load_all(&mut self, key: &str) -> Result<usize, RegistryError> {
        match self.fetch_all(key).await {
            Ok(count) => Ok(count),
            Err(err) => Err(self.fail(key, Operation::Load, err)),
        }
    }

    /// [`Registry::load_all`] without recording a failure, so callers can
    /// attribute it to their own operation.
    async fn fetch_all(&mut self, key: &str) -> Result<usize, RegistryError> {
        let schema = self.catalog.get(key)?.clone();
        self.bump(key);
        self.set_loading(key, true);

        let result = self
            .backend
            .list(&schema.resource)
            .await
            .and_then(|body| decode_page(&schema, body));
        let entities = match result {
            Ok(entities) => entities,
            Err(err) => {
                self.set_loading(key, false);
                return Err(err);
            }
        };

        let count = entities.len();
        let chosen = self.selected(key);
        let state = self.state_mut(key)?;
        state.entities.replace_all(entities);
        state.loaded = true;
        state.loading = false;
        state.error = None;
        let dangling = chosen.is_some_and(|id| !state.entities.contains(id));

        if dangling {
            self.choose(key, None);
        }
        self.refresh_view(key);
        tracing::info!(collection = key, count, "collection loaded");
        Ok(count)
    }

    /// Choose `parent` for `child` and fetch the child's rows when they are
    /// not cached yet. Returns whether the fetched rows were applied.
    ///
    /// # Errors
    ///
    /// `NotFound`/`Validation` for a parent that is not selectable, or any
    /// backend error from the child fetch.
    pub async fn select_parent(&mut self, child: &str, parent: Option<EntityId>) -> Result<Applied, RegistryError> {
        let request = self.begin_select_parent(child, parent)?;
        let response = request.send().await;
        self.apply_children(response)
    }

    /// Refetch `child` under its current parent, ignoring the cache.
    ///
    /// # Errors
    ///
    /// Any backend or decode error.
    pub async fn refresh_children(&mut self, child: &str) -> Result<Applied, RegistryError> {
        let schema = self.catalog.get(child)?.clone();
        let parent = self.parent_selection(child).flatten();
        let generation = self.bump(child);
        self.set_loading(child, true);
        let request = ChildRequest::new(child, parent, generation, Some(schema.resource), Arc::clone(&self.backend));
        let response = request.send().await;
        self.apply_children(response)
    }

    /// First half of [`Registry::select_parent`]: update the selection,
    /// clear everything downstream, and hand out the fetch ticket.
    ///
    /// The child's displayed set is recomputed immediately from whatever is
    /// cached, so it never shows rows of the previous parent.
    ///
    /// # Errors
    ///
    /// `Schema` when `child` has no parent collection, `NotFound` when the
    /// parent collection is loaded and lacks `parent`, `Validation` when
    /// `parent` is hidden by the selection above it.
    pub fn begin_select_parent(&mut self, child: &str, parent: Option<EntityId>) -> Result<ChildRequest, RegistryError> {
        let schema = self.catalog.get(child)?.clone();
        let Some(link) = schema.parent.clone() else {
            return Err(RegistryError::Schema(format!("`{child}` has no parent collection")));
        };
        if let Some(parent) = parent
            && let Err(err) = self.check_selectable(&link, parent)
        {
            return Err(self.fail(child, Operation::SelectParent, err));
        }

        self.choose(&link.collection, parent);
        let generation = self.selections.get(child).map_or(0, |selection| selection.generation);
        let state = self.state_mut(child)?;
        let fetch = parent.is_some() && !state.loaded;
        state.loading = fetch;
        state.error = None;

        let resource = fetch.then_some(schema.resource);
        Ok(ChildRequest::new(child, parent, generation, resource, Arc::clone(&self.backend)))
    }

    /// Second half of [`Registry::select_parent`]. A response whose
    /// generation or parent no longer matches is discarded without touching
    /// any state.
    ///
    /// # Errors
    ///
    /// The fetch error of a current response. Stale failures are dropped.
    pub fn apply_children(&mut self, response: ChildResponse) -> Result<Applied, RegistryError> {
        let key = response.collection.as_str();
        let schema = self.catalog.get(key)?.clone();
        let current = self.selections.get(key).copied().unwrap_or_default();
        let chosen = self.parent_selection(key).flatten();
        if !current.is_current(response.generation) || chosen != response.parent {
            tracing::debug!(
                collection = key,
                generation = response.generation,
                current = current.generation,
                "discarding stale child response"
            );
            return Ok(Applied::Stale);
        }

        let Some(result) = response.result else {
            self.set_loading(key, false);
            self.refresh_view(key);
            return Ok(Applied::Fresh);
        };
        match result.and_then(|body| decode_page(&schema, body)) {
            Ok(entities) => {
                let state = self.state_mut(key)?;
                state.entities.replace_all(entities);
                state.loaded = true;
                state.loading = false;
                state.error = None;
                self.refresh_view(key);
                Ok(Applied::Fresh)
            }
            Err(err) => Err(self.fail(key, Operation::SelectParent, err)),
        }
    }
}

// =============================================================================
// MUTATIONS
// =============================================================================

impl Registry {
    /// Validate, create on the backend, append locally.
    ///
    /// When the backend answers without the created record the collection
    /// is reloaded instead.
    ///
    /// # Errors
    ///
    /// `Validation` before any backend call, `NotFound`/`Validation` for an
    /// unusable parent, `Conflict` for duplicates, `Network`/`Server`.
    pub async fn add(&mut self, key: &str, fields: Fields) -> Result<Entity, RegistryError> {
        let schema = self.catalog.get(key)?.clone();
        let fields = match self.prepare(&schema, fields) {
            Ok(fields) => fields,
            Err(err) => return Err(self.fail(key, Operation::Add, err)),
        };
        let lineage = self.lineage(&schema, fields.parent);
        let body = schema.encode(&fields, &lineage);

        let reply = match self.backend.create(&schema.resource, &body).await {
            Ok(reply) => reply,
            Err(err) => return Err(self.fail(key, Operation::Add, err)),
        };

        let created = match envelope::single(reply).map(|record| schema.decode(&record)) {
            Some(Ok(entity)) => {
                self.state_mut(key)?.entities.upsert(entity.clone());
                entity
            }
            _ => {
                tracing::debug!(collection = key, "create reply without record; reloading");
                match self.reload_created(key, &fields).await {
                    Ok(entity) => entity,
                    Err(err) => return Err(self.fail(key, Operation::Add, err)),
                }
            }
        };

        self.clear_error(key);
        self.refresh_view(key);
        tracing::info!(collection = key, id = %created.id, "entity added");
        Ok(created)
    }

    /// Full update of an existing entity, replaced in place.
    ///
    /// `fields` overlays the current record: `status: None` keeps the
    /// current status, `parent: None` keeps the current parent, and extra
    /// fields not mentioned are carried over.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is not in the local collection, plus everything
    /// [`Registry::add`] can return.
    pub async fn edit(&mut self, key: &str, id: EntityId, fields: Fields) -> Result<Entity, RegistryError> {
        let schema = self.catalog.get(key)?.clone();
        let Some(existing) = self.state(key)?.entities.get(id).cloned() else {
            return Err(self.fail(key, Operation::Edit, RegistryError::not_found(key, id)));
        };

        let mut merged = fields;
        let mut extra = existing.extra.clone();
        extra.extend(std::mem::take(&mut merged.extra));
        merged.extra = extra;
        merged.status = merged.status.or(Some(existing.status));
        if schema.parent.is_some() {
            merged.parent = merged.parent.or(existing.parent);
        }
        let fields = match self.prepare(&schema, merged) {
            Ok(fields) => fields,
            Err(err) => return Err(self.fail(key, Operation::Edit, err)),
        };
        let lineage = self.lineage(&schema, fields.parent);
        let body = schema.encode(&fields, &lineage);

        let reply = match self.backend.update(&schema.resource, id, &body).await {
            Ok(reply) => reply,
            Err(err) => return Err(self.fail(key, Operation::Edit, err)),
        };

        let decoded = match envelope::single(reply) {
            Some(record) => schema.decode(&record),
            None => schema.decode(&with_id(body, id)),
        };
        let mut updated = match decoded {
            Ok(entity) => entity,
            Err(err) => return Err(self.fail(key, Operation::Edit, err)),
        };
        updated.id = id;

        self.state_mut(key)?.entities.replace(updated.clone());
        self.clear_error(key);
        self.refresh_view(key);
        if self.selected(key) == Some(id) && !self.is_visible(key, &updated) {
            self.choose(key, None);
        }
        if self.editing_matches(key, id) {
            self.editing = None;
        }
        tracing::info!(collection = key, id = %id, "entity updated");
        Ok(updated)
    }

    /// Delete on the backend, then drop the row everywhere it is shown.
    ///
    /// Confirmation is the caller's responsibility. Removing the entity
    /// under edit cancels the edit session; removing a selected entity
    /// clears that selection and everything downstream.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is not local, `Network`/`Server` from the backend.
    pub async fn remove(&mut self, key: &str, id: EntityId) -> Result<(), RegistryError> {
        let schema = self.catalog.get(key)?.clone();
        if !self.state(key)?.entities.contains(id) {
            return Err(self.fail(key, Operation::Remove, RegistryError::not_found(key, id)));
        }

        if let Err(err) = self.backend.delete(&schema.resource, id).await {
            return Err(self.fail(key, Operation::Remove, err));
        }

        self.state_mut(key)?.entities.remove(id);
        self.clear_error(key);
        self.refresh_view(key);
        if self.selected(key) == Some(id) {
            self.choose(key, None);
        }
        if self.editing_matches(key, id) {
            tracing::debug!(collection = key, id = %id, "edit session closed by delete");
            self.editing = None;
        }
        tracing::info!(collection = key, id = %id, "entity deleted");
        Ok(())
    }

    /// Flip `status` with a partial update. Only the status of that one row
    /// changes locally; the server's value wins when the reply carries one.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is not local, `Network`/`Server` from the backend.
    pub async fn toggle_status(&mut self, key: &str, id: EntityId) -> Result<Entity, RegistryError> {
        let schema = self.catalog.get(key)?.clone();
        let Some(current) = self.state(key)?.entities.get(id).map(|entity| entity.status) else {
            return Err(self.fail(key, Operation::ToggleStatus, RegistryError::not_found(key, id)));
        };

        let wanted = !current;
        let reply = match self
            .backend
            .patch(&schema.resource, id, &schema.status_patch(wanted))
            .await
        {
            Ok(reply) => reply,
            Err(err) => return Err(self.fail(key, Operation::ToggleStatus, err)),
        };
        let status = reply_status(&reply).unwrap_or(wanted);

        let state = self.state_mut(key)?;
        state.entities.set_status(id, status);
        state.error = None;
        let toggled = state.entities.get(id).cloned().ok_or_else(|| RegistryError::not_found(key, id))?;
        self.refresh_view(key);
        tracing::info!(collection = key, id = %id, status, "status toggled");
        Ok(toggled)
    }
}

// =============================================================================
// EDIT SESSION
// =============================================================================

impl Registry {
    /// Open the edit form on `id`, returning its current fields.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is not in the local collection.
    pub fn begin_edit(&mut self, key: &str, id: EntityId) -> Result<Fields, RegistryError> {
        let fields = self
            .state(key)?
            .entities
            .get(id)
            .map(Entity::to_fields)
            .ok_or_else(|| RegistryError::not_found(key, id))?;
        self.editing = Some((key.to_owned(), id));
        Ok(fields)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    #[must_use]
    pub fn editing(&self) -> Option<(&str, EntityId)> {
        self.editing.as_ref().map(|(key, id)| (key.as_str(), *id))
    }

    fn editing_matches(&self, key: &str, id: EntityId) -> bool {
        self.editing().is_some_and(|(open_key, open_id)| open_key == key && open_id == id)
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

impl Registry {
    /// Full local collection in backend order.
    ///
    /// # Errors
    ///
    /// `UnknownCollection` for keys outside the catalog.
    pub fn entities(&self, key: &str) -> Result<&[Entity], RegistryError> {
        Ok(self.state(key)?.entities.as_slice())
    }

    /// Rows visible under the current parent selection. Root collections
    /// display everything.
    ///
    /// # Errors
    ///
    /// `UnknownCollection` for keys outside the catalog.
    pub fn displayed(&self, key: &str) -> Result<&[Entity], RegistryError> {
        Ok(&self.state(key)?.displayed)
    }

    /// Active rows of the parent collection visible under its own parent
    /// selection. Empty for root collections.
    ///
    /// # Errors
    ///
    /// `UnknownCollection` for keys outside the catalog.
    pub fn parent_options(&self, key: &str) -> Result<Vec<Entity>, RegistryError> {
        match &self.catalog.get(key)?.parent {
            Some(link) => Ok(active_options(self.displayed(&link.collection)?)),
            None => Ok(Vec::new()),
        }
    }

    /// Display label of `entity`'s parent, `"Unknown"` when it is not loaded.
    ///
    /// # Errors
    ///
    /// `UnknownCollection` for keys outside the catalog.
    pub fn parent_label(&self, key: &str, entity: &Entity) -> Result<Option<String>, RegistryError> {
        let (Some(link), Some(parent)) = (&self.catalog.get(key)?.parent, entity.parent) else {
            return Ok(None);
        };
        Ok(Some(label_of(self.entities(&link.collection)?, parent).to_owned()))
    }

    /// # Errors
    ///
    /// `UnknownCollection` for keys outside the catalog.
    pub fn stats(&self, key: &str) -> Result<CollectionStats, RegistryError> {
        Ok(self.state(key)?.entities.stats())
    }

    /// Search, filter, sort and paginate the full collection.
    ///
    /// # Errors
    ///
    /// `UnknownCollection` for keys outside the catalog.
    pub fn query(&self, key: &str, query: &ListQuery) -> Result<PageView, RegistryError> {
        Ok(query.apply(self.entities(key)?))
    }

    #[must_use]
    pub fn last_error(&self, key: &str) -> Option<&str> {
        self.collections.get(key).and_then(|state| state.error.as_deref())
    }

    #[must_use]
    pub fn is_loading(&self, key: &str) -> bool {
        self.collections.get(key).is_some_and(|state| state.loading)
    }

    #[must_use]
    pub fn is_loaded(&self, key: &str) -> bool {
        self.collections.get(key).is_some_and(|state| state.loaded)
    }

    /// Value chosen in `key`'s own dropdown.
    #[must_use]
    pub fn selected(&self, key: &str) -> Option<EntityId> {
        self.selections.get(key).and_then(|selection| selection.chosen)
    }

    /// Parent currently filtering `child`.
    #[must_use]
    pub fn selected_parent(&self, child: &str) -> Option<EntityId> {
        self.parent_selection(child).flatten()
    }
}

// =============================================================================
// INTERNALS
// =============================================================================

impl Registry {
    fn state(&self, key: &str) -> Result<&CollectionState, RegistryError> {
        self.collections
            .get(key)
            .ok_or_else(|| RegistryError::UnknownCollection(key.to_owned()))
    }

    fn state_mut(&mut self, key: &str) -> Result<&mut CollectionState, RegistryError> {
        self.collections
            .get_mut(key)
            .ok_or_else(|| RegistryError::UnknownCollection(key.to_owned()))
    }

    fn set_loading(&mut self, key: &str, loading: bool) {
        if let Some(state) = self.collections.get_mut(key) {
            state.loading = loading;
        }
    }

    fn clear_error(&mut self, key: &str) {
        if let Some(state) = self.collections.get_mut(key) {
            state.error = None;
        }
    }

    fn bump(&mut self, key: &str) -> u64 {
        self.selections.entry(key.to_owned()).or_default().bump()
    }

    /// Record the failure on the collection, log it, and hand it back.
    fn fail(&mut self, key: &str, operation: Operation, err: RegistryError) -> RegistryError {
        let noun = self
            .catalog
            .get(key)
            .map_or_else(|_| key.to_owned(), |schema| schema.noun.clone());
        let message = operation.failure_message(&noun, &err);
        tracing::warn!(
            collection = key,
            operation = operation.as_str(),
            code = err.error_code(),
            error = %err,
            "registry operation failed"
        );
        if let Some(state) = self.collections.get_mut(key) {
            state.loading = false;
            state.error = Some(message);
        }
        err
    }

    /// `None` for root collections, otherwise the parent collection's chosen
    /// value.
    fn parent_selection(&self, key: &str) -> Option<Option<EntityId>> {
        let Ok(schema) = self.catalog.get(key) else {
            return None;
        };
        let link = schema.parent.as_ref()?;
        Some(self.selected(&link.collection))
    }

    fn is_visible(&self, key: &str, entity: &Entity) -> bool {
        match self.parent_selection(key) {
            None => true,
            Some(chosen) => chosen.is_some() && entity.parent == chosen,
        }
    }

    /// Recompute the displayed set of `key` from its full collection.
    fn refresh_view(&mut self, key: &str) {
        let parent = self.parent_selection(key);
        if let Some(state) = self.collections.get_mut(key) {
            state.displayed = match parent {
                None => state.entities.as_slice().to_vec(),
                Some(chosen) => cascade(state.entities.as_slice(), chosen),
            };
        }
    }

    /// Set `key`'s chosen value and invalidate everything downstream: every
    /// descendant loses its selection, gets a new generation, and has its
    /// displayed set recomputed.
    fn choose(&mut self, key: &str, value: Option<EntityId>) {
        self.selections.entry(key.to_owned()).or_default().chosen = value;

        let mut pending: Vec<String> = self.catalog.children_of(key).map(|schema| schema.key.clone()).collect();
        while let Some(child) = pending.pop() {
            let selection = self.selections.entry(child.clone()).or_default();
            selection.chosen = None;
            selection.bump();
            self.set_loading(&child, false);
            self.refresh_view(&child);
            pending.extend(self.catalog.children_of(&child).map(|schema| schema.key.clone()));
        }
    }

    /// A parent offered in a dropdown must exist, be active, and be visible
    /// under the selection above it (a scoped parent collection with nothing
    /// chosen above offers nothing). Only checked once the parent collection
    /// is loaded.
    fn check_selectable(&self, link: &ParentLink, parent: EntityId) -> Result<(), RegistryError> {
        let state = self.state(&link.collection)?;
        if !state.loaded {
            return Ok(());
        }
        let Some(entity) = state.entities.get(parent) else {
            return Err(RegistryError::not_found(&link.collection, parent));
        };
        if !entity.status {
            return Err(RegistryError::validation(&link.field, format!("{} is inactive", link.title)));
        }
        if !self.is_visible(&link.collection, entity) {
            return Err(RegistryError::validation(
                &link.field,
                format!("{} is not available under the current selection", link.title),
            ));
        }
        Ok(())
    }

    /// Validate the draft and check its parent reference. A parent must
    /// exist and be active once the parent collection is loaded.
    fn prepare(&self, schema: &ResourceSchema, fields: Fields) -> Result<Fields, RegistryError> {
        let fields = schema.validate(fields)?;
        if let (Some(link), Some(parent)) = (&schema.parent, fields.parent) {
            let state = self.state(&link.collection)?;
            if state.loaded {
                match state.entities.get(parent) {
                    None => return Err(RegistryError::not_found(&link.collection, parent)),
                    Some(entity) if !entity.status => {
                        return Err(RegistryError::validation(&link.field, format!("{} is inactive", link.title)));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(fields)
    }

    /// Ancestor ids above `parent`, nearest first.
    ///
    /// The chain is walked through loaded collections. Where a level is not
    /// loaded, the remaining ancestors are read from the denormalized
    /// fields of the last entity the walk reached.
    fn lineage(&self, schema: &ResourceSchema, parent: Option<EntityId>) -> Vec<(String, EntityId)> {
        let mut chain = Vec::new();
        let (Some(link), Some(mut current)) = (&schema.parent, parent) else {
            return chain;
        };
        let mut collection = link.collection.clone();
        let mut reached: Option<&Entity> = None;
        while let Ok(level) = self.catalog.get(&collection) {
            let Some(up) = &level.parent else {
                break;
            };
            let Some(entity) = self
                .collections
                .get(&collection)
                .and_then(|state| state.entities.get(current))
            else {
                break;
            };
            reached = Some(entity);
            let Some(next) = entity.parent else {
                break;
            };
            chain.push((up.collection.clone(), next));
            collection = up.collection.clone();
            current = next;
        }

        if let Some(entity) = reached {
            for ancestor in &schema.ancestors {
                if chain.iter().any(|(key, _)| *key == ancestor.collection) {
                    continue;
                }
                if let Some(id) = entity.extra.get(&ancestor.field).and_then(EntityId::from_value) {
                    chain.push((ancestor.collection.clone(), id));
                }
            }
        }
        chain
    }

    /// Reload `key` and pick the newest row matching the submitted label and
    /// parent. Failures are left for the caller to attribute.
    async fn reload_created(&mut self, key: &str, fields: &Fields) -> Result<Entity, RegistryError> {
        self.fetch_all(key).await?;
        self.find_created(key, fields)
    }

    fn find_created(&self, key: &str, fields: &Fields) -> Result<Entity, RegistryError> {
        self.state(key)?
            .entities
            .iter()
            .rev()
            .find(|entity| entity.label == fields.label && entity.parent == fields.parent)
            .cloned()
            .ok_or_else(|| RegistryError::Decode(format!("created {key} `{}` missing after reload", fields.label)))
    }
}

fn decode_page(schema: &ResourceSchema, body: Value) -> Result<Vec<Entity>, RegistryError> {
    envelope::page(body)?
        .items
        .iter()
        .map(|record| schema.decode(record))
        .collect()
}

fn with_id(mut body: Value, id: EntityId) -> Value {
    if let Value::Object(map) = &mut body {
        map.insert("id".to_owned(), Value::from(id.0));
    }
    body
}

/// Status carried by a PATCH reply, raw or under `data`.
fn reply_status(reply: &Value) -> Option<bool> {
    reply
        .get("status")
        .or_else(|| reply.get("data").and_then(|data| data.get("status")))
        .and_then(normalize_status)
}
