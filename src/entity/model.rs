//! Page and content item models with their request payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Publishable;
use crate::grid::Layout;

/// Generate a fresh entity key
pub fn generate_key() -> String {
    Uuid::new_v4().to_string()
}

/// A composed page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub key: String,

    pub business_unit_key: String,

    /// Store version token, filled on read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub attributes: Map<String, Value>,

    #[serde(default)]
    pub layout: Layout,

    /// Keys of the page-owned sub-components referenced by the layout
    #[serde(default)]
    pub components: Vec<String>,
}

impl Page {
    /// Register a component key; returns false if it was already present
    pub fn add_component(&mut self, key: &str) -> bool {
        if self.components.iter().any(|k| k == key) {
            return false;
        }
        self.components.push(key.to_string());
        true
    }

    /// Unregister a component key; returns false if it was absent
    pub fn remove_component(&mut self, key: &str) -> bool {
        let before = self.components.len();
        self.components.retain(|k| k != key);
        self.components.len() != before
    }

    pub fn has_component(&self, key: &str) -> bool {
        self.components.iter().any(|k| k == key)
    }
}

impl Publishable for Page {
    const KIND: &'static str = "page";

    fn key(&self) -> &str {
        &self.key
    }

    fn business_unit_key(&self) -> &str {
        &self.business_unit_key
    }

    fn set_version(&mut self, version: Option<u64>) {
        self.version = version;
    }
}

/// Fields accepted when creating a page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPage {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// Page fields replaceable by an update; layout changes go through the grid operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

impl PageUpdate {
    pub fn apply(self, page: &mut Page) {
        if let Some(name) = self.name {
            page.name = name;
        }
        if let Some(attributes) = self.attributes {
            page.attributes = attributes;
        }
    }
}

/// A reusable content item, or a sub-component owned by a page cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub key: String,

    pub business_unit_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Component type, e.g. "hero" or "product-grid"
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Publishable for ContentItem {
    const KIND: &'static str = "content-item";

    fn key(&self) -> &str {
        &self.key
    }

    fn business_unit_key(&self) -> &str {
        &self.business_unit_key
    }

    fn set_version(&mut self, version: Option<u64>) {
        self.version = version;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewContentItem {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItemUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl ContentItemUpdate {
    pub fn apply(self, item: &mut ContentItem) {
        if let Some(name) = self.name {
            item.name = Some(name);
        }
        if let Some(properties) = self.properties {
            item.properties = properties;
        }
    }
}
