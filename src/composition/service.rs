//! Composition service: construction, content items and shared helpers.

use std::sync::Arc;

use crate::config::CompositionConfig;
use crate::entity::{
    generate_key, ContentItem, ContentItemUpdate, EntityLifecycle, NewContentItem, Page,
    Repository, WithStates,
};
use crate::errors::{ContentError, ContentResult};
use crate::observability::{log_event_with_fields, Event};
use crate::store::ObjectStore;

/// Label for page-owned components in errors and logs
pub(super) const PAGE_COMPONENT: &str = "page-component";

/// Orchestrates pages, content items and page-owned components
#[derive(Debug)]
pub struct CompositionService {
    pub(super) config: CompositionConfig,
    pub(super) pages: EntityLifecycle<Page>,
    pub(super) content_items: EntityLifecycle<ContentItem>,
    /// Sub-entities referenced from page cells
    pub(super) components: Repository<ContentItem>,
}

impl CompositionService {
    pub fn new(store: Arc<dyn ObjectStore>, config: CompositionConfig) -> Self {
        let containers = &config.containers;
        Self {
            pages: EntityLifecycle::new(store.clone(), containers.pages(), config.max_versions),
            content_items: EntityLifecycle::new(
                store.clone(),
                containers.content_items(),
                config.max_versions,
            ),
            components: Repository::with_label(
                store,
                containers.page_components.clone(),
                PAGE_COMPONENT,
            ),
            config,
        }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Draft/publish/version operations for pages
    pub fn pages(&self) -> &EntityLifecycle<Page> {
        &self.pages
    }

    /// Draft/publish/version operations for content items
    pub fn content_items(&self) -> &EntityLifecycle<ContentItem> {
        &self.content_items
    }

    // ==================
    // Content items
    // ==================

    pub fn create_content_item(&self, business_unit_key: &str, new: NewContentItem) -> ContentResult<ContentItem> {
        require(business_unit_key, "businessUnitKey")?;
        require(&new.kind, "type")?;

        let item = ContentItem {
            key: generate_key(),
            business_unit_key: business_unit_key.to_string(),
            version: None,
            kind: new.kind,
            name: new.name,
            properties: new.properties,
        };
        self.content_items.create_tracked(&item)
    }

    pub fn update_content_item(
        &self,
        business_unit_key: &str,
        key: &str,
        update: ContentItemUpdate,
    ) -> ContentResult<ContentItem> {
        let mut item = self.content_items.get(business_unit_key, key)?;
        update.apply(&mut item);
        self.content_items.save_tracked(&item)
    }

    pub fn delete_content_item(&self, business_unit_key: &str, key: &str) -> ContentResult<()> {
        self.content_items.delete(business_unit_key, key)
    }

    pub fn get_content_item(&self, business_unit_key: &str, key: &str) -> ContentResult<ContentItem> {
        self.content_items.get(business_unit_key, key)
    }

    pub fn list_content_items(&self, business_unit_key: &str) -> ContentResult<Vec<ContentItem>> {
        self.content_items.list(business_unit_key)
    }

    pub fn get_content_item_with_states(
        &self,
        business_unit_key: &str,
        key: &str,
    ) -> ContentResult<WithStates<ContentItem>> {
        self.content_items.effective(business_unit_key, key)
    }

    // ==================
    // Helpers
    // ==================

    /// Delete page-owned components, logging and skipping any that fail
    pub(super) fn cascade_delete_components(&self, business_unit_key: &str, keys: &[String]) {
        for key in keys {
            match self.components.delete(business_unit_key, key) {
                Ok(()) => log_event_with_fields(
                    Event::CascadeDelete,
                    &[("kind", PAGE_COMPONENT), ("key", key)],
                ),
                Err(e) => {
                    let error = e.to_string();
                    log_event_with_fields(
                        Event::CascadeDeleteFailed,
                        &[("kind", PAGE_COMPONENT), ("key", key), ("error", &error)],
                    );
                }
            }
        }
    }
}

/// Reject an empty required value
pub(super) fn require(value: &str, name: &str) -> ContentResult<()> {
    if value.trim().is_empty() {
        return Err(ContentError::invalid(format!("{} is required", name)));
    }
    Ok(())
}
