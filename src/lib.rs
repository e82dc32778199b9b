//! gridpress - grid page composition with drafts, publishing and bounded version history
//!
//! Layers, bottom up:
//!
//! - `store`: keyed JSON object storage behind the `ObjectStore` trait
//! - `grid`: the row/cell layout and its editing operations
//! - `state`: draft/published state records per entity
//! - `version`: bounded, newest-first version history per entity
//! - `entity`: pages, content items and their tracked lifecycle
//! - `composition`: the page composition service
//! - `http_server`, `cli`: outer surfaces

pub mod cli;
pub mod composition;
pub mod config;
pub mod entity;
pub mod errors;
pub mod grid;
pub mod http_server;
pub mod observability;
pub mod state;
pub mod store;
pub mod version;

pub use composition::CompositionService;
pub use config::{AppConfig, CompositionConfig};
pub use errors::{ContentError, ContentResult};
