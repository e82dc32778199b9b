//! # gridpress HTTP Server Module
//!
//! A thin axum layer over `CompositionService`. Every route lives under a
//! business unit path segment.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/:biz/pages/*` - Pages, their grid and page-owned components
//! - `/:biz/content-items/*` - Standalone content items
//! - `.../states/*` and `.../versions/*` - Draft/publish and version history for both

use std::sync::Arc;

use crate::composition::CompositionService;

pub mod config;
pub mod content_item_routes;
pub mod errors;
pub mod lifecycle_routes;
pub mod page_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{RestError, RestResult};
pub use server::HttpServer;

/// Router state shared by every handler
pub type SharedService = Arc<CompositionService>;
