//! Typed CRUD over one object store container.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use super::Publishable;
use crate::errors::{ContentError, ContentResult};
use crate::store::{record_key, Filter, ObjectStore, StoreError, StoredObject};

/// Canonical storage for one entity kind in one container
#[derive(Debug)]
pub struct Repository<E> {
    store: Arc<dyn ObjectStore>,
    container: String,
    /// Name used in errors; `E::KIND` unless overridden
    label: &'static str,
    _kind: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            container: self.container.clone(),
            label: self.label,
            _kind: PhantomData,
        }
    }
}

impl<E: Publishable> Repository<E> {
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>) -> Self {
        Self::with_label(store, container, E::KIND)
    }

    /// A repository whose errors name `label` instead of the entity kind
    pub fn with_label(
        store: Arc<dyn ObjectStore>,
        container: impl Into<String>,
        label: &'static str,
    ) -> Self {
        Self {
            store,
            container: container.into(),
            label,
            _kind: PhantomData,
        }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Load one entity. A record owned by another business unit is not found.
    pub fn get(&self, business_unit_key: &str, key: &str) -> ContentResult<E> {
        match self.store.get(&self.container, &record_key(business_unit_key, key)?) {
            Ok(object) => {
                let entity = self.decode(object)?;
                if entity.business_unit_key() != business_unit_key || entity.key() != key {
                    return Err(self.not_found(key));
                }
                Ok(entity)
            }
            Err(StoreError::NotFound { .. }) => Err(self.not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(&self, business_unit_key: &str) -> ContentResult<Vec<E>> {
        self.store
            .query(&self.container, &Filter::business_unit(business_unit_key))?
            .into_iter()
            .map(|object| self.decode(object))
            .collect()
    }

    pub fn create(&self, entity: &E) -> ContentResult<E> {
        let key = record_key(entity.business_unit_key(), entity.key())?;
        match self.store.create(&self.container, &key, self.encode(entity)?) {
            Ok(object) => self.decode(object),
            Err(StoreError::AlreadyExists { .. }) => Err(ContentError::Conflict(format!(
                "{} {} already exists",
                self.label,
                entity.key()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the stored entity. The version token on `entity` is not checked.
    pub fn update(&self, entity: &E) -> ContentResult<E> {
        let key = record_key(entity.business_unit_key(), entity.key())?;
        match self.store.update(&self.container, &key, self.encode(entity)?) {
            Ok(object) => self.decode(object),
            Err(StoreError::NotFound { .. }) => Err(self.not_found(entity.key())),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, business_unit_key: &str, key: &str) -> ContentResult<()> {
        match self.store.delete(&self.container, &record_key(business_unit_key, key)?) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound { .. }) => Err(self.not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    /// Stored form: the entity without its version token
    fn encode(&self, entity: &E) -> ContentResult<Value> {
        let mut value = serde_json::to_value(entity)
            .map_err(|e| ContentError::Storage(format!("serialize {}: {}", self.label, e)))?;
        if let Value::Object(map) = &mut value {
            map.remove("version");
        }
        Ok(value)
    }

    fn decode(&self, object: StoredObject) -> ContentResult<E> {
        let mut entity: E = serde_json::from_value(object.value)
            .map_err(|e| ContentError::Storage(format!("corrupt {}: {}", self.label, e)))?;
        entity.set_version(Some(object.version));
        Ok(entity)
    }

    fn not_found(&self, key: &str) -> ContentError {
        ContentError::not_found(format!("{} {}", self.label, key))
    }
}
