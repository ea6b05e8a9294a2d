//! Backend seam: one method per REST verb on a collection endpoint.
//!
//! Bodies are raw JSON so each implementation stays shape-agnostic; the
//! registry normalizes responses through `envelope` and `schema`.

use serde_json::Value;

use crate::error::RegistryError;
use crate::model::entity::EntityId;

/// Provider-neutral async trait for the REST backend. Enables mocking in tests.
///
/// `resource` is the endpoint segment from the schema (e.g.
/// `"branch-locations"`), addressed as `/{resource}/` and `/{resource}/{id}/`.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `GET /{resource}/`
    ///
    /// # Errors
    ///
    /// Returns `Network` on transport failure, `Server` on non-2xx.
    async fn list(&self, resource: &str) -> Result<Value, RegistryError>;

    /// `POST /{resource}/`
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on duplicate rejections, `Network`/`Server` otherwise.
    async fn create(&self, resource: &str, body: &Value) -> Result<Value, RegistryError>;

    /// `PUT /{resource}/{id}/`
    ///
    /// # Errors
    ///
    /// Returns `Conflict` on duplicate rejections, `Network`/`Server` otherwise.
    async fn update(&self, resource: &str, id: EntityId, body: &Value) -> Result<Value, RegistryError>;

    /// `PATCH /{resource}/{id}/`
    ///
    /// # Errors
    ///
    /// Returns `Network` on transport failure, `Server` on non-2xx.
    async fn patch(&self, resource: &str, id: EntityId, body: &Value) -> Result<Value, RegistryError>;

    /// `DELETE /{resource}/{id}/`
    ///
    /// # Errors
    ///
    /// Returns `Network` on transport failure, `Server` on non-2xx.
    async fn delete(&self, resource: &str, id: EntityId) -> Result<(), RegistryError>;
}
