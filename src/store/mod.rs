//! # Object Store
//!
//! The persistent key-value collaborator, namespaced by container and key.
//!
//! The composition core only ever talks to the `ObjectStore` trait. Each call
//! is independent: the trait offers no transactions and `update` does not check
//! the stored version token, so concurrent writers resolve by last write wins.

pub mod errors;
pub mod filter;
pub mod memory;

pub use errors::{StoreError, StoreResult};
pub use filter::{Filter, FilterExpr};
pub use memory::InMemoryObjectStore;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A value as held by the store, with its store-assigned identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Store-assigned id, stable across updates
    pub id: Uuid,

    /// Opaque version token, bumped on every write
    pub version: u64,

    pub value: Value,
}

/// Trait for the external object store
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Get a value, or `StoreError::NotFound`
    fn get(&self, container: &str, key: &str) -> StoreResult<StoredObject>;

    /// Create a value; fails `AlreadyExists` if the key is taken
    fn create(&self, container: &str, key: &str, value: Value) -> StoreResult<StoredObject>;

    /// Overwrite an existing value; fails `NotFound` if absent
    fn update(&self, container: &str, key: &str, value: Value) -> StoreResult<StoredObject>;

    /// Delete a value; fails `NotFound` if absent
    fn delete(&self, container: &str, key: &str) -> StoreResult<()>;

    /// All values in a container matching the filter
    fn query(&self, container: &str, filter: &Filter) -> StoreResult<Vec<StoredObject>>;

    /// Create or overwrite
    fn upsert(&self, container: &str, key: &str, value: Value) -> StoreResult<StoredObject> {
        match self.update(container, key, value.clone()) {
            Err(e) if e.is_not_found() => self.create(container, key, value),
            other => other,
        }
    }
}

/// Composite store key `"{businessUnitKey}_{entityKey}"`.
///
/// The business unit may not be empty or contain `_`, so every key splits back
/// into exactly one `(business unit, entity)` pair.
pub fn record_key(business_unit_key: &str, entity_key: &str) -> StoreResult<String> {
    if business_unit_key.is_empty() || business_unit_key.contains('_') {
        return Err(StoreError::InvalidKey(format!(
            "business unit key {:?} must be non-empty and contain no '_'",
            business_unit_key
        )));
    }
    Ok(format!("{}_{}", business_unit_key, entity_key))
}
