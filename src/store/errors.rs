//! # Object Store Errors

use thiserror::Error;

/// Result type for object store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Object store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Object not found: {container}/{key}")]
    NotFound { container: String, key: String },

    #[error("Object already exists: {container}/{key}")]
    AlreadyExists { container: String, key: String },

    /// Key that cannot be stored unambiguously
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(container: &str, key: &str) -> Self {
        StoreError::NotFound {
            container: container.to_string(),
            key: key.to_string(),
        }
    }

    pub fn already_exists(container: &str, key: &str) -> Self {
        StoreError::AlreadyExists {
            container: container.to_string(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("pages", "biz_home");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Object not found: pages/biz_home");
    }

    #[test]
    fn test_backend_is_not_not_found() {
        assert!(!StoreError::Backend("disk".into()).is_not_found());
    }
}
