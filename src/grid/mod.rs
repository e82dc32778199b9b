//! # Layout Grid
//!
//! Rows and cells arranging content items on a page. Everything here is a pure
//! transform over an owned `Layout`; no store access.
//!
//! Operations that drop a content item reference (`remove_row`,
//! `set_cell_component` on an occupied cell, `clear_cell_component`) hand the
//! dropped keys back so the caller can cascade their deletion.

pub mod errors;
mod layout;
mod resize;

pub use errors::{GridError, GridResult};
pub use layout::{GridCell, GridRow, Layout};
pub use resize::{ResizeOptions, ResizeOutcome};

/// Default number of columns in a row
pub const DEFAULT_COLUMN_COUNT: u32 = 12;
