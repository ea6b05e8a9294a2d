//! Client-side state.
//!
//! Pure data and pure functions: nothing in here calls the backend except
//! `ChildRequest::send`, which owns its backend handle. The registry is the
//! only writer.

pub mod cascade;
pub mod collection;
pub mod query;
pub mod selection;
