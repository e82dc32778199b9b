//! # In-Memory Object Store
//!
//! Reference `ObjectStore` used by tests and by `gridpress serve`.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::filter::Filter;
use super::{ObjectStore, StoredObject};

type Container = BTreeMap<String, StoredObject>;

/// In-memory object store
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    containers: RwLock<HashMap<String, Container>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values held in a container
    pub fn len(&self, container: &str) -> usize {
        self.containers
            .read()
            .map(|c| c.get(container).map(|m| m.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Check if a container is empty
    pub fn is_empty(&self, container: &str) -> bool {
        self.len(container) == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("Lock poisoned".to_string())
}

impl ObjectStore for InMemoryObjectStore {
    fn get(&self, container: &str, key: &str) -> StoreResult<StoredObject> {
        let containers = self.containers.read().map_err(|_| poisoned())?;
        containers
            .get(container)
            .and_then(|c| c.get(key))
            .cloned()
            .ok_or_else(|| StoreError::not_found(container, key))
    }

    fn create(&self, container: &str, key: &str, value: Value) -> StoreResult<StoredObject> {
        let mut containers = self.containers.write().map_err(|_| poisoned())?;
        let objects = containers.entry(container.to_string()).or_default();
        if objects.contains_key(key) {
            return Err(StoreError::already_exists(container, key));
        }

        let object = StoredObject {
            id: Uuid::new_v4(),
            version: 1,
            value,
        };
        objects.insert(key.to_string(), object.clone());
        Ok(object)
    }

    fn update(&self, container: &str, key: &str, value: Value) -> StoreResult<StoredObject> {
        let mut containers = self.containers.write().map_err(|_| poisoned())?;
        let object = containers
            .get_mut(container)
            .and_then(|c| c.get_mut(key))
            .ok_or_else(|| StoreError::not_found(container, key))?;

        object.version += 1;
        object.value = value;
        Ok(object.clone())
    }

    fn delete(&self, container: &str, key: &str) -> StoreResult<()> {
        let mut containers = self.containers.write().map_err(|_| poisoned())?;
        containers
            .get_mut(container)
            .and_then(|c| c.remove(key))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(container, key))
    }

    fn query(&self, container: &str, filter: &Filter) -> StoreResult<Vec<StoredObject>> {
        let containers = self.containers.read().map_err(|_| poisoned())?;
        Ok(containers
            .get(container)
            .map(|objects| {
                objects
                    .values()
                    .filter(|o| filter.matches(&o.value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
