//! Version log over the object store.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::record::{VersionEntry, VersionRecord};
use crate::errors::{ContentError, ContentResult};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{record_key, ObjectStore, StoreError};

/// Bounded version history for one entity kind
#[derive(Debug, Clone)]
pub struct VersionLog {
    store: Arc<dyn ObjectStore>,
    container: String,
    max_versions: usize,
}

impl VersionLog {
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>, max_versions: usize) -> Self {
        Self {
            store,
            container: container.into(),
            max_versions,
        }
    }

    pub fn max_versions(&self) -> usize {
        self.max_versions
    }

    /// The record for an entity, or an empty list if nothing was appended yet
    pub fn fetch_versions(&self, business_unit_key: &str, entity_key: &str) -> ContentResult<VersionRecord> {
        let key = record_key(business_unit_key, entity_key)?;
        match self.store.get(&self.container, &key) {
            Ok(object) => serde_json::from_value(object.value)
                .map_err(|e| ContentError::Storage(format!("corrupt version record {}: {}", key, e))),
            Err(StoreError::NotFound { .. }) => Ok(VersionRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_version(
        &self,
        business_unit_key: &str,
        entity_key: &str,
        version_id: &Uuid,
    ) -> ContentResult<VersionEntry> {
        self.fetch_versions(business_unit_key, entity_key)?
            .get(version_id)
            .cloned()
            .ok_or_else(|| ContentError::not_found(format!("version {} of {}", version_id, entity_key)))
    }

    /// Record a new snapshot as the newest version
    pub fn append_version(
        &self,
        business_unit_key: &str,
        entity_key: &str,
        snapshot: Value,
    ) -> ContentResult<VersionRecord> {
        let mut record = self.fetch_versions(business_unit_key, entity_key)?;
        let entry = VersionEntry::new(snapshot);
        let id = entry.id.to_string();
        let evicted = record.push_front(entry, self.max_versions);

        let value = serde_json::to_value(&record)
            .map_err(|e| ContentError::Storage(format!("serialize version record: {}", e)))?;
        self.store
            .upsert(&self.container, &record_key(business_unit_key, entity_key)?, value)?;

        log_event_with_fields(Event::VersionAppended, &[("key", entity_key), ("version", &id)]);
        if evicted > 0 {
            log_event_with_fields(
                Event::VersionsTruncated,
                &[("key", entity_key), ("evicted", &evicted.to_string())],
            );
        }
        Ok(record)
    }

    /// Remove the record; a missing record is not an error
    pub fn delete_versions(&self, business_unit_key: &str, entity_key: &str) -> ContentResult<()> {
        match self
            .store
            .delete(&self.container, &record_key(business_unit_key, entity_key)?)
        {
            Ok(()) | Err(StoreError::NotFound { .. }) => {
                log_event_with_fields(Event::VersionsDeleted, &[("key", entity_key)]);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
