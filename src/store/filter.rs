//! # Query Filters
//!
//! Where-expressions evaluated by `ObjectStore::query` against stored JSON values.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single field condition: the top-level field equals `value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    /// Top-level field of the stored value
    pub field: String,

    /// Value to compare against
    pub value: Value,
}

impl FilterExpr {
    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check if a stored value matches this condition. A missing field never matches.
    pub fn matches(&self, doc: &Value) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}

/// A where-expression: conditions combined with AND logic.
///
/// An empty filter matches every value in the container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<FilterExpr>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: FilterExpr) -> Self {
        self.conditions.push(condition);
        self
    }

    /// All values belonging to one business unit
    pub fn business_unit(business_unit_key: &str) -> Self {
        Self::new().and(FilterExpr::eq("businessUnitKey", business_unit_key))
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }
}
