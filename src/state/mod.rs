//! # Draft / Published State
//!
//! Each editable entity has at most one `StateRecord`, keyed by
//! `"{businessUnitKey}_{entityKey}"` in its kind's states container. The record
//! is written lazily on the first draft save or publish and removed with the
//! entity.

mod record;
mod store;

pub use record::{StateRecord, Status};
pub use store::StateStore;
