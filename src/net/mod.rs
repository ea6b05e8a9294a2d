//! Backend boundary.
//!
//! ARCHITECTURE
//! ============
//! `Backend` is the only way the registry talks to a server. `HttpBackend`
//! speaks REST over `reqwest`; `MemoryBackend` keeps rows in process for
//! tests and offline use. `envelope` flattens the response shapes both of
//! them return so the registry only ever sees canonical pages and records.

pub mod backend;
pub mod envelope;
pub mod http;
pub mod memory;

pub use backend::Backend;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
