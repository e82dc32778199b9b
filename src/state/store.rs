//! State store over the object store.

use std::sync::Arc;

use serde_json::Value;

use super::record::StateRecord;
use crate::config::EntityContainers;
use crate::errors::{ContentError, ContentResult};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{record_key, ObjectStore, StoreError};

/// Draft/published lifecycle for one entity kind
#[derive(Debug, Clone)]
pub struct StateStore {
    store: Arc<dyn ObjectStore>,
    containers: EntityContainers,
}

impl StateStore {
    pub fn new(store: Arc<dyn ObjectStore>, containers: EntityContainers) -> Self {
        Self { store, containers }
    }

    /// The record for an entity, or an empty one if none was ever written
    pub fn fetch_states(&self, business_unit_key: &str, entity_key: &str) -> ContentResult<StateRecord> {
        let key = record_key(business_unit_key, entity_key)?;
        match self.store.get(&self.containers.states, &key) {
            Ok(object) => serde_json::from_value(object.value)
                .map_err(|e| ContentError::Storage(format!("corrupt state record {}: {}", key, e))),
            Err(StoreError::NotFound { .. }) => Ok(StateRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_draft(
        &self,
        business_unit_key: &str,
        entity_key: &str,
        snapshot: Value,
    ) -> ContentResult<StateRecord> {
        let mut states = self.fetch_states(business_unit_key, entity_key)?;
        states.draft = Some(snapshot);
        self.write(business_unit_key, entity_key, &states)?;

        log_event_with_fields(Event::DraftSaved, &[("key", entity_key)]);
        Ok(states)
    }

    /// Set the published snapshot, optionally discarding the draft
    pub fn publish(
        &self,
        business_unit_key: &str,
        entity_key: &str,
        snapshot: Value,
        clear_draft: bool,
    ) -> ContentResult<StateRecord> {
        let mut states = self.fetch_states(business_unit_key, entity_key)?;
        states.published = Some(snapshot);
        if clear_draft {
            states.draft = None;
        }
        self.write(business_unit_key, entity_key, &states)?;

        log_event_with_fields(Event::Published, &[("key", entity_key)]);
        Ok(states)
    }

    /// Drop the draft and overwrite the canonical entity with the published
    /// snapshot. Returns the snapshot as written.
    pub fn revert_to_published(&self, business_unit_key: &str, entity_key: &str) -> ContentResult<Value> {
        let mut states = self.fetch_states(business_unit_key, entity_key)?;
        let mut snapshot = states
            .published
            .clone()
            .ok_or_else(|| ContentError::NoPublishedState(entity_key.to_string()))?;

        if let Value::Object(map) = &mut snapshot {
            map.insert("businessUnitKey".into(), Value::String(business_unit_key.into()));
            map.insert("key".into(), Value::String(entity_key.into()));
            map.remove("version");
        }

        states.draft = None;
        self.write(business_unit_key, entity_key, &states)?;
        self.store.update(
            &self.containers.entities,
            &record_key(business_unit_key, entity_key)?,
            snapshot.clone(),
        )?;

        log_event_with_fields(Event::RevertedToPublished, &[("key", entity_key)]);
        Ok(snapshot)
    }

    /// Remove the record; a missing record is not an error
    pub fn delete_states(&self, business_unit_key: &str, entity_key: &str) -> ContentResult<()> {
        match self
            .store
            .delete(&self.containers.states, &record_key(business_unit_key, entity_key)?)
        {
            Ok(()) | Err(StoreError::NotFound { .. }) => {
                log_event_with_fields(Event::StatesDeleted, &[("key", entity_key)]);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, business_unit_key: &str, entity_key: &str, states: &StateRecord) -> ContentResult<()> {
        let value = serde_json::to_value(states)
            .map_err(|e| ContentError::Storage(format!("serialize state record: {}", e)))?;
        self.store.upsert(
            &self.containers.states,
            &record_key(business_unit_key, entity_key)?,
            value,
        )?;
        Ok(())
    }
}
