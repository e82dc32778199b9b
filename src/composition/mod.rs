//! # Composition Service
//!
//! Entry point for every page and content item operation. Keeps the layout
//! grid, the state store and the version log consistent with the canonical
//! entities and cascades deletes into page-owned components.
//!
//! The entity, draft and version writes of one operation are separate store
//! calls. They are not atomic: if a later call fails the earlier writes stay.

mod pages;
mod service;

pub use pages::{PlacedComponent, ResolvedPage};
pub use service::CompositionService;
