//! Client for hierarchical reference data (states, locations, departments,
//! banks, ...) kept in collections behind a REST backend.
//!
//! `Registry` is the entry point: it loads collections, keeps child
//! collections filtered by their selected parent, and applies creates,
//! updates, deletes and status toggles locally once the backend accepts
//! them.

pub mod config;
pub mod error;
pub mod model;
pub mod net;
pub mod registry;
pub mod session;
pub mod state;

pub use config::ClientConfig;
pub use error::{ErrorCode, Operation, RegistryError};
pub use model::entity::{Entity, EntityId, Fields};
pub use model::schema::{Catalog, ResourceSchema};
pub use net::{Backend, HttpBackend, MemoryBackend};
pub use registry::Registry;
pub use session::{Role, Session, SessionContext};
pub use state::query::{ListQuery, PageView, Sort, StatusFilter};
pub use state::selection::Applied;
