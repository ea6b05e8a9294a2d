//! Declarative resource schemas and the catalog of master collections.
//!
//! DESIGN
//! ======
//! Every master screen differs only in endpoint, label field, and which
//! parent it hangs under. A `ResourceSchema` captures exactly that, and is
//! the single place backend field names are translated to and from the
//! canonical `Entity`.
//!
//! The catalog is validated once on construction: keys are unique, parent
//! and ancestor links resolve, and the parent relation is acyclic.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use super::entity::{Entity, EntityId, Fields, normalize_status};
use crate::error::RegistryError;

// =============================================================================
// TYPES
// =============================================================================

/// How a resource expects `status` on the wire. Inbound values are always
/// normalized, whatever the setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusWire {
    #[default]
    Bool,
    Numeric,
}

impl StatusWire {
    #[must_use]
    pub fn encode(self, status: bool) -> Value {
        match self {
            Self::Bool => Value::Bool(status),
            Self::Numeric => Value::from(i64::from(status)),
        }
    }
}

/// Link from a child resource to the collection its `parent` points into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParentLink {
    pub collection: String,
    /// Backend field carrying the parent id (e.g. `branch_state`).
    pub field: String,
    /// Form title used in validation messages (e.g. `"State"`).
    pub title: String,
}

/// A higher ancestor reference the backend stores denormalized on the child
/// (a sub-location also carries `branch_state`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AncestorField {
    pub collection: String,
    pub field: String,
}

/// An extra form field that must be non-empty after trimming.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequiredField {
    pub field: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    /// Collection key used by callers (e.g. `"locations"`).
    pub key: String,
    /// Singular noun for messages (e.g. `"location"`).
    pub noun: String,
    /// Endpoint path segment below the base URL (e.g. `"branch-locations"`).
    pub resource: String,
    pub label_field: String,
    pub label_title: String,
    pub parent: Option<ParentLink>,
    pub ancestors: Vec<AncestorField>,
    pub required: Vec<RequiredField>,
    pub status_wire: StatusWire,
}

// =============================================================================
// SCHEMA BUILDER
// =============================================================================

impl ResourceSchema {
    /// A root collection labeled by `name`, with boolean status.
    #[must_use]
    pub fn new(key: &str, noun: &str, resource: &str) -> Self {
        Self {
            key: key.to_owned(),
            noun: noun.to_owned(),
            resource: resource.trim_matches('/').to_owned(),
            label_field: "name".to_owned(),
            label_title: format!("{} name", capitalize(noun)),
            parent: None,
            ancestors: Vec::new(),
            required: Vec::new(),
            status_wire: StatusWire::Bool,
        }
    }

    #[must_use]
    pub fn label(mut self, field: &str, title: &str) -> Self {
        self.label_field = field.to_owned();
        self.label_title = title.to_owned();
        self
    }

    #[must_use]
    pub fn child_of(mut self, collection: &str, field: &str, title: &str) -> Self {
        self.parent = Some(ParentLink {
            collection: collection.to_owned(),
            field: field.to_owned(),
            title: title.to_owned(),
        });
        self
    }

    #[must_use]
    pub fn carries(mut self, collection: &str, field: &str) -> Self {
        self.ancestors.push(AncestorField { collection: collection.to_owned(), field: field.to_owned() });
        self
    }

    #[must_use]
    pub fn requires(mut self, field: &str, title: &str) -> Self {
        self.required.push(RequiredField { field: field.to_owned(), title: title.to_owned() });
        self
    }

    #[must_use]
    pub fn numeric_status(mut self) -> Self {
        self.status_wire = StatusWire::Numeric;
        self
    }

    #[must_use]
    pub fn parent_field(&self) -> Option<&str> {
        self.parent.as_ref().map(|link| link.field.as_str())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

impl ResourceSchema {
    /// Check a draft before it is sent. Returns the trimmed fields.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] naming the first offending field.
    pub fn validate(&self, mut fields: Fields) -> Result<Fields, RegistryError> {
        fields.label = fields.label.trim().to_owned();
        if fields.label.is_empty() {
            return Err(RegistryError::validation(
                &self.label_field,
                format!("{} is required", self.label_title),
            ));
        }

        match (&self.parent, fields.parent) {
            (Some(link), None) => {
                return Err(RegistryError::validation(&link.field, format!("{} is required", link.title)));
            }
            (None, Some(_)) => {
                return Err(RegistryError::validation(
                    "parent",
                    format!("{} is not scoped under a parent", capitalize(&self.noun)),
                ));
            }
            _ => {}
        }

        for required in &self.required {
            let present = match fields.extra.get_mut(&required.field) {
                Some(Value::String(raw)) => {
                    *raw = raw.trim().to_owned();
                    !raw.is_empty()
                }
                Some(Value::Null) | None => false,
                Some(_) => true,
            };
            if !present {
                return Err(RegistryError::validation(&required.field, format!("{} is required", required.title)));
            }
        }

        Ok(fields)
    }
}

// =============================================================================
// WIRE MAPPING
// =============================================================================

impl ResourceSchema {
    /// Map one backend record to the canonical entity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Decode`] when the record is not an object or
    /// lacks an id or label, or carries an unrecognized status.
    pub fn decode(&self, value: &Value) -> Result<Entity, RegistryError> {
        let Value::Object(map) = value else {
            return Err(RegistryError::Decode(format!("{}: expected an object, got {value}", self.key)));
        };

        let id = map
            .get("id")
            .or_else(|| map.get("pk"))
            .and_then(EntityId::from_value)
            .ok_or_else(|| RegistryError::Decode(format!("{}: record without id", self.key)))?;

        let label = match map.get(&self.label_field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => {
                return Err(RegistryError::Decode(format!(
                    "{} {id}: missing `{}`",
                    self.key, self.label_field
                )));
            }
        };

        let status = match map.get("status") {
            None | Some(Value::Null) => true,
            Some(raw) => normalize_status(raw)
                .ok_or_else(|| RegistryError::Decode(format!("{} {id}: unrecognized status {raw}", self.key)))?,
        };

        let parent = self
            .parent_field()
            .and_then(|field| map.get(field))
            .and_then(EntityId::from_value);

        let extra = map
            .iter()
            .filter(|(name, _)| !self.is_canonical_field(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(Entity { id, label, status, parent, extra })
    }

    /// Build a create/update body. `lineage` lists resolved ancestor ids
    /// (collection key, id) above the direct parent.
    #[must_use]
    pub fn encode(&self, fields: &Fields, lineage: &[(String, EntityId)]) -> Value {
        let mut body: Map<String, Value> = fields.extra.clone();
        body.insert(self.label_field.clone(), Value::String(fields.label.clone()));
        body.insert("status".to_owned(), self.status_wire.encode(fields.status.unwrap_or(true)));

        if let (Some(link), Some(parent)) = (&self.parent, fields.parent) {
            body.insert(link.field.clone(), Value::from(parent.0));
        }
        for ancestor in &self.ancestors {
            if let Some((_, id)) = lineage.iter().find(|(key, _)| *key == ancestor.collection) {
                body.insert(ancestor.field.clone(), Value::from(id.0));
            }
        }
        Value::Object(body)
    }

    /// Partial-update body for a status toggle.
    #[must_use]
    pub fn status_patch(&self, status: bool) -> Value {
        let mut body = Map::new();
        body.insert("status".to_owned(), self.status_wire.encode(status));
        Value::Object(body)
    }

    fn is_canonical_field(&self, name: &str) -> bool {
        name == "id" || name == "pk" || name == "status" || name == self.label_field || Some(name) == self.parent_field()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Validated set of resource schemas forming a parent/child DAG.
#[derive(Clone, Debug)]
pub struct Catalog {
    schemas: Vec<ResourceSchema>,
}

impl Catalog {
    /// Validate and wrap a set of schemas.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Schema`] on duplicate keys, unresolved parent
    /// or ancestor links, or a cycle in the parent relation.
    pub fn new(schemas: Vec<ResourceSchema>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for schema in &schemas {
            if !seen.insert(schema.key.as_str()) {
                return Err(RegistryError::Schema(format!("duplicate collection key `{}`", schema.key)));
            }
        }

        for schema in &schemas {
            if let Some(link) = &schema.parent {
                if !seen.contains(link.collection.as_str()) {
                    return Err(RegistryError::Schema(format!(
                        "`{}` names unknown parent `{}`",
                        schema.key, link.collection
                    )));
                }
            }
        }

        let catalog = Self { schemas };
        for schema in &catalog.schemas {
            let lineage = catalog.lineage(&schema.key)?;
            for ancestor in &schema.ancestors {
                if !lineage.iter().skip(1).any(|key| *key == ancestor.collection) {
                    return Err(RegistryError::Schema(format!(
                        "`{}` carries `{}` which is not above its parent",
                        schema.key, ancestor.collection
                    )));
                }
            }
        }
        Ok(catalog)
    }

    /// The master screens of the admin dashboard.
    #[must_use]
    pub fn masters() -> Self {
        Self { schemas: master_schemas() }
    }

    /// Look up a schema by collection key.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCollection`] for unknown keys.
    pub fn get(&self, key: &str) -> Result<&ResourceSchema, RegistryError> {
        self.schemas
            .iter()
            .find(|schema| schema.key == key)
            .ok_or_else(|| RegistryError::UnknownCollection(key.to_owned()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceSchema> {
        self.schemas.iter()
    }

    /// Collections whose parent is `key`.
    pub fn children_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ResourceSchema> + 'a {
        self.schemas
            .iter()
            .filter(move |schema| schema.parent.as_ref().is_some_and(|link| link.collection == key))
    }

    /// Parent chain of `key`, nearest first (excluding `key` itself).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCollection`] for unknown keys and
    /// [`RegistryError::Schema`] when the chain loops back on itself.
    pub fn lineage(&self, key: &str) -> Result<Vec<&str>, RegistryError> {
        let mut chain = Vec::new();
        let mut current = self.get(key)?;
        while let Some(link) = &current.parent {
            if link.collection == key || chain.contains(&link.collection.as_str()) {
                return Err(RegistryError::Schema(format!("parent cycle through `{key}`")));
            }
            chain.push(link.collection.as_str());
            current = self.get(&link.collection)?;
        }
        Ok(chain)
    }
}

fn master_schemas() -> Vec<ResourceSchema> {
    vec![
        ResourceSchema::new("states", "state", "branch-states"),
        ResourceSchema::new("locations", "location", "branch-locations").child_of("states", "branch_state", "State"),
        ResourceSchema::new("sublocations", "sub-location", "sublocations")
            .label("name", "Sub location name")
            .child_of("locations", "branch_location", "Location")
            .carries("states", "branch_state"),
        ResourceSchema::new("pincodes", "pincode", "pincodes")
            .label("pincode", "Pincode")
            .child_of("sublocations", "sub_location", "Sub location")
            .carries("locations", "branch_location")
            .carries("states", "branch_state"),
        ResourceSchema::new("inner_states", "branch state", "branch-inner-states"),
        ResourceSchema::new("inner_locations", "branch location", "branch-inner-locations").child_of(
            "inner_states",
            "branch_inner_state",
            "Branch state",
        ),
        ResourceSchema::new("departments", "department", "departments"),
        ResourceSchema::new("designations", "designation", "designations").child_of(
            "departments",
            "department",
            "Department",
        ),
        ResourceSchema::new("banks", "bank", "banks").label("bank_name", "Bank name"),
        ResourceSchema::new("account_types", "account type", "typeofaccounts").label("account_type", "Account type"),
        ResourceSchema::new("vendor_banks", "vendor bank", "vendor-banks")
            .label("vendor_bank_name", "Vendor bank name")
            .numeric_status(),
        ResourceSchema::new("bank_designations", "banker designation", "bank-designations")
            .label("designation_name", "Designation name")
            .numeric_status(),
        ResourceSchema::new("dsa_names", "DSA name", "dsa-names")
            .label("bsa_name", "DSA name")
            .numeric_status(),
        ResourceSchema::new("payout_categories", "payout category", "payout-categories")
            .label("category_name", "Category name")
            .requires("category_code", "Category code"),
        ResourceSchema::new("payout_types", "payout type", "payout-types").label("payout_type", "Payout type"),
    ]
}
