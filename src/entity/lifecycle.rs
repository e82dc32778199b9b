//! Canonical entity + draft/published state + version log, for any entity kind.
//!
//! Every tracked write is three independent store calls issued in order:
//! canonical entity, draft snapshot, version append. There is no transaction
//! around them and no compensation; a failure part-way leaves the earlier
//! writes in place and surfaces the error.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::{Publishable, Repository};
use crate::config::EntityContainers;
use crate::errors::{ContentError, ContentResult};
use crate::observability::{log_event_with_fields, Event};
use crate::state::{StateRecord, StateStore, Status};
use crate::store::ObjectStore;
use crate::version::{VersionEntry, VersionLog, VersionRecord};

/// An entity resolved through its states, with the states it came from
#[derive(Debug, Clone, PartialEq)]
pub struct WithStates<E> {
    /// Draft, else published, else the canonical entity
    pub entity: E,
    pub states: StateRecord,
}

impl<E> WithStates<E> {
    pub fn status(&self) -> Status {
        self.states.status()
    }
}

/// The versionable, publishable lifecycle of one entity kind
#[derive(Debug)]
pub struct EntityLifecycle<E> {
    repository: Repository<E>,
    states: StateStore,
    versions: VersionLog,
}

impl<E: Publishable> EntityLifecycle<E> {
    pub fn new(store: Arc<dyn ObjectStore>, containers: EntityContainers, max_versions: usize) -> Self {
        Self {
            repository: Repository::new(store.clone(), containers.entities.clone()),
            versions: VersionLog::new(store.clone(), containers.versions.clone(), max_versions),
            states: StateStore::new(store, containers),
        }
    }

    pub fn repository(&self) -> &Repository<E> {
        &self.repository
    }

    pub fn get(&self, business_unit_key: &str, key: &str) -> ContentResult<E> {
        self.repository.get(business_unit_key, key)
    }

    pub fn list(&self, business_unit_key: &str) -> ContentResult<Vec<E>> {
        self.repository.list(business_unit_key)
    }

    /// Create the entity, seed its draft and append its first version
    pub fn create_tracked(&self, entity: &E) -> ContentResult<E> {
        let created = self.repository.create(entity)?;
        log_event_with_fields(Event::EntityCreated, &[("kind", E::KIND), ("key", created.key())]);
        self.track(&created)?;
        Ok(created)
    }

    /// Overwrite the entity, save a draft and append a version
    pub fn save_tracked(&self, entity: &E) -> ContentResult<E> {
        let saved = self.repository.update(entity)?;
        log_event_with_fields(Event::EntityUpdated, &[("kind", E::KIND), ("key", saved.key())]);
        self.track(&saved)?;
        Ok(saved)
    }

    fn track(&self, entity: &E) -> ContentResult<()> {
        let snapshot = Self::snapshot(entity)?;
        self.states
            .save_draft(entity.business_unit_key(), entity.key(), snapshot.clone())?;
        self.versions
            .append_version(entity.business_unit_key(), entity.key(), snapshot)?;
        Ok(())
    }

    /// Delete the entity, then its states, then its versions
    pub fn delete(&self, business_unit_key: &str, key: &str) -> ContentResult<()> {
        self.repository.delete(business_unit_key, key)?;
        self.states.delete_states(business_unit_key, key)?;
        self.versions.delete_versions(business_unit_key, key)?;
        log_event_with_fields(Event::EntityDeleted, &[("kind", E::KIND), ("key", key)]);
        Ok(())
    }

    /// Resolve the effective entity: draft, else published, else canonical
    pub fn effective(&self, business_unit_key: &str, key: &str) -> ContentResult<WithStates<E>> {
        let states = self.states.fetch_states(business_unit_key, key)?;
        let entity = match states.preferred() {
            Some(snapshot) => Self::decode_snapshot(business_unit_key, key, snapshot.clone())
                .map_err(|e| ContentError::Storage(format!("stored snapshot of {}: {}", key, e)))?,
            None => self.repository.get(business_unit_key, key)?,
        };
        Ok(WithStates { entity, states })
    }

    pub fn fetch_states(&self, business_unit_key: &str, key: &str) -> ContentResult<StateRecord> {
        self.states.fetch_states(business_unit_key, key)
    }

    /// Save a caller-supplied draft snapshot; it must decode as this entity kind
    pub fn save_draft(&self, business_unit_key: &str, key: &str, snapshot: Value) -> ContentResult<StateRecord> {
        let snapshot = Self::normalize(business_unit_key, key, snapshot)?;
        self.states.save_draft(business_unit_key, key, snapshot)
    }

    pub fn publish(
        &self,
        business_unit_key: &str,
        key: &str,
        snapshot: Value,
        clear_draft: bool,
    ) -> ContentResult<StateRecord> {
        let snapshot = Self::normalize(business_unit_key, key, snapshot)?;
        self.states.publish(business_unit_key, key, snapshot, clear_draft)
    }

    /// Publish the current effective entity
    pub fn publish_current(&self, business_unit_key: &str, key: &str, clear_draft: bool) -> ContentResult<StateRecord> {
        let current = self.effective(business_unit_key, key)?;
        let snapshot = Self::snapshot(&current.entity)?;
        self.states.publish(business_unit_key, key, snapshot, clear_draft)
    }

    /// Drop the draft and restore the canonical entity from the published snapshot
    pub fn revert_to_published(&self, business_unit_key: &str, key: &str) -> ContentResult<E> {
        self.states.revert_to_published(business_unit_key, key)?;
        self.repository.get(business_unit_key, key)
    }

    pub fn fetch_versions(&self, business_unit_key: &str, key: &str) -> ContentResult<VersionRecord> {
        self.versions.fetch_versions(business_unit_key, key)
    }

    pub fn get_version(&self, business_unit_key: &str, key: &str, version_id: &Uuid) -> ContentResult<VersionEntry> {
        self.versions.get_version(business_unit_key, key, version_id)
    }

    pub fn append_version(&self, business_unit_key: &str, key: &str, snapshot: Value) -> ContentResult<VersionRecord> {
        let snapshot = Self::normalize(business_unit_key, key, snapshot)?;
        self.versions.append_version(business_unit_key, key, snapshot)
    }

    /// Write a retained version back as the canonical entity.
    ///
    /// The restore goes through the normal tracked save, so it becomes the
    /// newest version and the current draft.
    pub fn restore_version(&self, business_unit_key: &str, key: &str, version_id: &Uuid) -> ContentResult<E> {
        let entry = self.versions.get_version(business_unit_key, key, version_id)?;
        let entity = Self::decode_snapshot(business_unit_key, key, entry.snapshot)
            .map_err(|e| ContentError::Storage(format!("stored version {}: {}", version_id, e)))?;
        let restored = self.save_tracked(&entity)?;

        let id = version_id.to_string();
        log_event_with_fields(Event::VersionRestored, &[("key", key), ("version", &id)]);
        Ok(restored)
    }

    fn snapshot(entity: &E) -> ContentResult<Value> {
        serde_json::to_value(entity)
            .map_err(|e| ContentError::Storage(format!("serialize {}: {}", E::KIND, e)))
    }

    /// Decode a snapshot, forcing its identity to `(business_unit_key, key)`
    fn decode_snapshot(business_unit_key: &str, key: &str, mut snapshot: Value) -> Result<E, serde_json::Error> {
        if let Value::Object(map) = &mut snapshot {
            map.insert("businessUnitKey".into(), Value::String(business_unit_key.into()));
            map.insert("key".into(), Value::String(key.into()));
        }
        serde_json::from_value(snapshot)
    }

    /// Validate a caller-supplied snapshot and return its canonical form
    fn normalize(business_unit_key: &str, key: &str, snapshot: Value) -> ContentResult<Value> {
        if !snapshot.is_object() {
            return Err(ContentError::invalid(format!("{} snapshot must be an object", E::KIND)));
        }
        let entity = Self::decode_snapshot(business_unit_key, key, snapshot)
            .map_err(|e| ContentError::invalid(format!("invalid {} snapshot: {}", E::KIND, e)))?;
        Self::snapshot(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerNames;
    use crate::entity::ContentItem;
    use crate::store::InMemoryObjectStore;
    use serde_json::{json, Map};

    fn lifecycle() -> EntityLifecycle<ContentItem> {
        let store = Arc::new(InMemoryObjectStore::new());
        EntityLifecycle::new(store, ContainerNames::default().content_items(), 5)
    }

    fn item(key: &str, name: &str) -> ContentItem {
        ContentItem {
            key: key.into(),
            business_unit_key: "biz".into(),
            version: None,
            kind: "banner".into(),
            name: Some(name.into()),
            properties: Map::new(),
        }
    }

    #[test]
    fn test_create_tracked_seeds_draft_and_version() {
        let lifecycle = lifecycle();
        lifecycle.create_tracked(&item("i1", "A")).unwrap();

        let states = lifecycle.fetch_states("biz", "i1").unwrap();
        assert_eq!(states.status(), Status::Draft);
        assert_eq!(lifecycle.fetch_versions("biz", "i1").unwrap().len(), 1);
    }

    #[test]
    fn test_effective_prefers_draft_then_published_then_canonical() {
        let lifecycle = lifecycle();
        let created = lifecycle.repository().create(&item("i1", "canonical")).unwrap();
        assert_eq!(lifecycle.effective("biz", "i1").unwrap().entity, created);

        lifecycle.publish("biz", "i1", json!({"name": "live"}), false).unwrap();
        let effective = lifecycle.effective("biz", "i1").unwrap();
        assert_eq!(effective.entity.name.as_deref(), Some("live"));
        assert_eq!(effective.status(), Status::Published);

        lifecycle.save_draft("biz", "i1", json!({"name": "draft"})).unwrap();
        let effective = lifecycle.effective("biz", "i1").unwrap();
        assert_eq!(effective.entity.name.as_deref(), Some("draft"));
        assert_eq!(effective.entity.key, "i1");
        assert_eq!(effective.status(), Status::Both);
    }

    #[test]
    fn test_effective_of_unknown_entity_is_not_found() {
        assert!(lifecycle().effective("biz", "ghost").unwrap_err().is_not_found());
    }

    #[test]
    fn test_non_object_snapshot_rejected() {
        let err = lifecycle().save_draft("biz", "i1", json!("text")).unwrap_err();
        assert!(matches!(err, ContentError::InvalidRequest(_)));
    }

    #[test]
    fn test_revert_restores_published_entity() {
        let lifecycle = lifecycle();
        let created = lifecycle.create_tracked(&item("i1", "A")).unwrap();
        lifecycle.publish_current("biz", "i1", true).unwrap();

        let mut edited = created.clone();
        edited.name = Some("B".into());
        lifecycle.save_tracked(&edited).unwrap();

        let reverted = lifecycle.revert_to_published("biz", "i1").unwrap();
        assert_eq!(reverted.name.as_deref(), Some("A"));
        assert_eq!(lifecycle.fetch_states("biz", "i1").unwrap().status(), Status::Published);
    }

    #[test]
    fn test_restore_version_becomes_newest() {
        let lifecycle = lifecycle();
        let created = lifecycle.create_tracked(&item("i1", "first")).unwrap();
        let first_version = lifecycle.fetch_versions("biz", "i1").unwrap().versions[0].id;

        let mut edited = created.clone();
        edited.name = Some("second".into());
        lifecycle.save_tracked(&edited).unwrap();

        let restored = lifecycle.restore_version("biz", "i1", &first_version).unwrap();
        assert_eq!(restored.name.as_deref(), Some("first"));

        let versions = lifecycle.fetch_versions("biz", "i1").unwrap();
        assert_eq!(versions.len(), 3);
        assert_eq!(versions.versions[0].snapshot["name"], "first");
        assert_ne!(versions.versions[0].id, first_version);
    }

    #[test]
    fn test_delete_cascades_records() {
        let lifecycle = lifecycle();
        lifecycle.create_tracked(&item("i1", "A")).unwrap();
        lifecycle.delete("biz", "i1").unwrap();

        assert!(lifecycle.get("biz", "i1").unwrap_err().is_not_found());
        assert!(lifecycle.fetch_states("biz", "i1").unwrap().is_empty());
        assert!(lifecycle.fetch_versions("biz", "i1").unwrap().is_empty());
    }
}
