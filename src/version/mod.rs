//! # Version Log
//!
//! Bounded, newest-first snapshot history per entity. Appends never leave more
//! than the configured maximum; the oldest entries are evicted first.

mod log;
mod record;

pub use log::VersionLog;
pub use record::{VersionEntry, VersionRecord};
