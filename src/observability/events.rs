//! Observable events
//!
//! Every log line carries one of these as its `event` field.

use std::fmt;

use super::Severity;

/// Observable events in gridpress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Process lifecycle
    ConfigLoaded,
    ServerStarting,
    ServerStopped,

    // Entity writes
    EntityCreated,
    EntityUpdated,
    EntityDeleted,

    // Draft / publish
    DraftSaved,
    Published,
    RevertedToPublished,
    StatesDeleted,

    // Version log
    VersionAppended,
    VersionsTruncated,
    VersionRestored,
    VersionsDeleted,

    // Page composition
    ComponentAttached,
    ComponentDetached,
    RowAdded,
    RowRemoved,
    CellResized,
    CascadeDelete,
    /// A sub-entity could not be removed during a cascade; the caller carries on
    CascadeDeleteFailed,
    /// A component reference on a page has no live sub-entity
    DanglingComponent,

    /// Any store failure other than not-found
    StorageFailure,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStarting => "SERVER_STARTING",
            Event::ServerStopped => "SERVER_STOPPED",
            Event::EntityCreated => "ENTITY_CREATED",
            Event::EntityUpdated => "ENTITY_UPDATED",
            Event::EntityDeleted => "ENTITY_DELETED",
            Event::DraftSaved => "DRAFT_SAVED",
            Event::Published => "PUBLISHED",
            Event::RevertedToPublished => "REVERTED_TO_PUBLISHED",
            Event::StatesDeleted => "STATES_DELETED",
            Event::VersionAppended => "VERSION_APPENDED",
            Event::VersionsTruncated => "VERSIONS_TRUNCATED",
            Event::VersionRestored => "VERSION_RESTORED",
            Event::VersionsDeleted => "VERSIONS_DELETED",
            Event::ComponentAttached => "COMPONENT_ATTACHED",
            Event::ComponentDetached => "COMPONENT_DETACHED",
            Event::RowAdded => "ROW_ADDED",
            Event::RowRemoved => "ROW_REMOVED",
            Event::CellResized => "CELL_RESIZED",
            Event::CascadeDelete => "CASCADE_DELETE",
            Event::CascadeDeleteFailed => "CASCADE_DELETE_FAILED",
            Event::DanglingComponent => "DANGLING_COMPONENT",
            Event::StorageFailure => "STORAGE_FAILURE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StorageFailure => Severity::Error,
            Event::CascadeDeleteFailed | Event::DanglingComponent => Severity::Warn,
            Event::VersionAppended | Event::VersionsTruncated | Event::CascadeDelete => {
                Severity::Trace
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
