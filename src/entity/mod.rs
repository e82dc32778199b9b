//! # Versionable, Publishable Entities
//!
//! Pages and content items share one lifecycle: canonical storage, a
//! draft/published state record and a bounded version log. The kind-specific
//! parts are the model type (`Publishable`) and its `EntityContainers`.

mod lifecycle;
mod model;
mod repository;

pub use lifecycle::{EntityLifecycle, WithStates};
pub use model::{
    generate_key, ContentItem, ContentItemUpdate, NewContentItem, NewPage, Page, PageUpdate,
};
pub use repository::Repository;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// An entity that can be stored, drafted, published and versioned
pub trait Publishable: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Kind name used in messages and logs
    const KIND: &'static str;

    fn key(&self) -> &str;

    fn business_unit_key(&self) -> &str;

    /// Record the store's version token after a read or write
    fn set_version(&mut self, version: Option<u64>);
}
