//! Version entries and the bounded newest-first record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One retained snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub snapshot: Value,
}

impl VersionEntry {
    /// A fresh entry stamped now
    pub fn new(snapshot: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            snapshot,
        }
    }
}

/// Newest-first list of retained versions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

impl VersionRecord {
    /// Put `entry` at the front and drop the oldest entries beyond `max_versions`.
    ///
    /// Returns how many entries were evicted.
    pub fn push_front(&mut self, entry: VersionEntry, max_versions: usize) -> usize {
        self.versions.insert(0, entry);
        let evicted = self.versions.len().saturating_sub(max_versions);
        self.versions.truncate(max_versions);
        evicted
    }

    pub fn get(&self, id: &Uuid) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| &v.id == id)
    }

    pub fn latest(&self) -> Option<&VersionEntry> {
        self.versions.first()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
