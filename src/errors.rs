//! # Content Errors
//!
//! Domain error taxonomy shared by the state store, version log and the
//! composition service.

use thiserror::Error;

use crate::grid::GridError;
use crate::observability::{log_event_with_fields, Event};
use crate::store::StoreError;

/// Result type for content operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Content errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// Entity, state, version, row or cell absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No published state for {0}")]
    NoPublishedState(String),

    /// Opaque object store failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ContentError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status code: 404 and 400 for the client errors, 500 otherwise
    pub fn status_code(&self) -> u16 {
        match self {
            ContentError::NotFound(_) => 404,
            ContentError::InvalidRequest(_) => 400,
            ContentError::Conflict(_) => 500,
            ContentError::NoPublishedState(_) => 500,
            ContentError::Storage(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}

impl From<GridError> for ContentError {
    fn from(err: GridError) -> Self {
        if err.is_not_found() {
            ContentError::NotFound(err.to_string())
        } else {
            ContentError::InvalidRequest(err.to_string())
        }
    }
}

impl From<StoreError> for ContentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ContentError::NotFound(err.to_string()),
            StoreError::InvalidKey(message) => ContentError::InvalidRequest(message),
            other => {
                let message = other.to_string();
                log_event_with_fields(Event::StorageFailure, &[("error", &message)]);
                ContentError::Storage(message)
            }
        }
    }
}
