//! Page operations.
//!
//! Each layout mutation is: grid transform, cascade-delete whatever the
//! transform orphaned, then the tracked save (entity, draft, version).

use serde::Serialize;
use uuid::Uuid;

use super::service::{require, CompositionService, PAGE_COMPONENT};
use crate::entity::{generate_key, ContentItem, ContentItemUpdate, NewPage, Page, PageUpdate};
use crate::errors::{ContentError, ContentResult};
use crate::grid::{Layout, ResizeOptions};
use crate::observability::{log_event_with_fields, Event};
use crate::state::{StateRecord, Status};

/// The effective page with its component references resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPage {
    pub page: Page,
    /// Live sub-entities, in `page.components` order; dangling references are skipped
    pub components: Vec<ContentItem>,
    pub states: StateRecord,
    pub status: Status,
}

/// Result of placing a new component into a cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedComponent {
    pub page: Page,
    pub component: ContentItem,
}

impl CompositionService {
    pub fn create_page(&self, business_unit_key: &str, new: NewPage) -> ContentResult<Page> {
        require(business_unit_key, "businessUnitKey")?;

        let page = Page {
            key: generate_key(),
            business_unit_key: business_unit_key.to_string(),
            version: None,
            name: new.name,
            attributes: new.attributes,
            layout: Layout::with_empty_row(self.config.column_count),
            components: Vec::new(),
        };
        self.pages.create_tracked(&page)
    }

    pub fn get_page(&self, business_unit_key: &str, key: &str) -> ContentResult<Page> {
        self.pages.get(business_unit_key, key)
    }

    pub fn list_pages(&self, business_unit_key: &str) -> ContentResult<Vec<Page>> {
        self.pages.list(business_unit_key)
    }

    pub fn update_page(&self, business_unit_key: &str, key: &str, update: PageUpdate) -> ContentResult<Page> {
        let mut page = self.pages.get(business_unit_key, key)?;
        update.apply(&mut page);
        self.pages.save_tracked(&page)
    }

    /// Delete a page with its components, states and versions.
    ///
    /// Component deletion is best effort; the page goes regardless.
    pub fn delete_page(&self, business_unit_key: &str, key: &str) -> ContentResult<()> {
        let page = self.pages.get(business_unit_key, key)?;
        self.cascade_delete_components(business_unit_key, &page.components);
        self.pages.delete(business_unit_key, key)
    }

    /// Revert the page to its published snapshot and delete the components
    /// that only the discarded state referenced
    pub fn revert_page_to_published(&self, business_unit_key: &str, key: &str) -> ContentResult<Page> {
        let before = self.pages.get(business_unit_key, key)?;
        let reverted = self.pages.revert_to_published(business_unit_key, key)?;
        self.release_dropped(business_unit_key, &before, &reverted);
        Ok(reverted)
    }

    /// Restore a retained page version and delete the components it no
    /// longer references
    pub fn restore_page_version(
        &self,
        business_unit_key: &str,
        key: &str,
        version_id: &Uuid,
    ) -> ContentResult<Page> {
        let before = self.pages.get(business_unit_key, key)?;
        let restored = self.pages.restore_version(business_unit_key, key, version_id)?;
        self.release_dropped(business_unit_key, &before, &restored);
        Ok(restored)
    }

    /// Create a component of `component_type` and place it in a cell.
    ///
    /// A component already in the cell is replaced and deleted, unless the
    /// service rejects occupied cells.
    pub fn add_component_to_cell(
        &self,
        business_unit_key: &str,
        page_key: &str,
        component_type: &str,
        row_id: &str,
        cell_id: &str,
    ) -> ContentResult<PlacedComponent> {
        require(component_type, "componentType")?;
        let mut page = self.pages.get(business_unit_key, page_key)?;
        let occupied = page.layout.cell(row_id, cell_id)?.content_item_key.is_some();
        self.check_occupancy(occupied, row_id, cell_id)?;

        let component = self.components.create(&ContentItem {
            key: generate_key(),
            business_unit_key: business_unit_key.to_string(),
            version: None,
            kind: component_type.to_string(),
            name: None,
            properties: Default::default(),
        })?;

        let previous = page.layout.set_cell_component(row_id, cell_id, &component.key)?;
        page.add_component(&component.key);
        self.release(business_unit_key, &mut page, previous.into_iter().collect());

        log_event_with_fields(
            Event::ComponentAttached,
            &[("page", page_key), ("component", &component.key), ("type", component_type)],
        );
        let page = self.pages.save_tracked(&page)?;
        Ok(PlacedComponent { page, component })
    }

    pub fn add_row_to_page(
        &self,
        business_unit_key: &str,
        page_key: &str,
        at_index: Option<usize>,
    ) -> ContentResult<Page> {
        let mut page = self.pages.get(business_unit_key, page_key)?;
        let row_id = page.layout.add_row(self.config.column_count, at_index)?;

        log_event_with_fields(Event::RowAdded, &[("page", page_key), ("row", &row_id)]);
        self.pages.save_tracked(&page)
    }

    pub fn remove_row_from_page(&self, business_unit_key: &str, page_key: &str, row_id: &str) -> ContentResult<Page> {
        let mut page = self.pages.get(business_unit_key, page_key)?;
        let orphaned = page.layout.remove_row(row_id)?;
        self.release(business_unit_key, &mut page, orphaned);

        log_event_with_fields(Event::RowRemoved, &[("page", page_key), ("row", row_id)]);
        self.pages.save_tracked(&page)
    }

    pub fn update_cell_span_in_page(
        &self,
        business_unit_key: &str,
        page_key: &str,
        row_id: &str,
        cell_id: &str,
        col_span: u32,
        options: ResizeOptions,
    ) -> ContentResult<Page> {
        let mut page = self.pages.get(business_unit_key, page_key)?;
        // Only empty cells are ever consumed, so a resize orphans nothing.
        page.layout
            .resize_cell(row_id, cell_id, col_span, self.config.column_count, options)?;

        let span = col_span.to_string();
        log_event_with_fields(
            Event::CellResized,
            &[("page", page_key), ("cell", cell_id), ("colSpan", &span)],
        );
        self.pages.save_tracked(&page)
    }

    /// Edit a page-owned component, then record a new page version
    pub fn update_component_in_page(
        &self,
        business_unit_key: &str,
        page_key: &str,
        component_key: &str,
        update: ContentItemUpdate,
    ) -> ContentResult<ContentItem> {
        let page = self.pages.get(business_unit_key, page_key)?;
        Self::require_component(&page, component_key)?;

        let mut component = self.components.get(business_unit_key, component_key)?;
        update.apply(&mut component);
        let component = self.components.update(&component)?;

        self.pages.save_tracked(&page)?;
        Ok(component)
    }

    pub fn remove_component_from_page(
        &self,
        business_unit_key: &str,
        page_key: &str,
        component_key: &str,
    ) -> ContentResult<Page> {
        let mut page = self.pages.get(business_unit_key, page_key)?;
        Self::require_component(&page, component_key)?;

        if let Some((row_id, cell_id)) = page.layout.find_component(component_key) {
            page.layout.clear_cell_component(&row_id, &cell_id)?;
        }
        self.release(business_unit_key, &mut page, vec![component_key.to_string()]);

        log_event_with_fields(
            Event::ComponentDetached,
            &[("page", page_key), ("component", component_key)],
        );
        self.pages.save_tracked(&page)
    }

    /// Move a component to another cell; whatever held the target is replaced
    pub fn move_component_in_page(
        &self,
        business_unit_key: &str,
        page_key: &str,
        component_key: &str,
        row_id: &str,
        cell_id: &str,
    ) -> ContentResult<Page> {
        let mut page = self.pages.get(business_unit_key, page_key)?;
        Self::require_component(&page, component_key)?;

        let target = page.layout.cell(row_id, cell_id)?.content_item_key.clone();
        if target.as_deref() == Some(component_key) {
            return Ok(page);
        }
        self.check_occupancy(target.is_some(), row_id, cell_id)?;

        if let Some((from_row, from_cell)) = page.layout.find_component(component_key) {
            page.layout.clear_cell_component(&from_row, &from_cell)?;
        }
        let previous = page.layout.set_cell_component(row_id, cell_id, component_key)?;
        self.release(business_unit_key, &mut page, previous.into_iter().collect());

        self.pages.save_tracked(&page)
    }

    /// The effective page (draft, else published, else canonical) with its
    /// component references resolved against the live sub-entities
    pub fn get_page_with_states(&self, business_unit_key: &str, key: &str) -> ContentResult<ResolvedPage> {
        let effective = self.pages.effective(business_unit_key, key)?;

        let mut components = Vec::with_capacity(effective.entity.components.len());
        for component_key in &effective.entity.components {
            match self.components.get(business_unit_key, component_key) {
                Ok(component) => components.push(component),
                Err(ContentError::NotFound(_)) => log_event_with_fields(
                    Event::DanglingComponent,
                    &[("page", key), ("component", component_key)],
                ),
                Err(e) => return Err(e),
            }
        }

        let status = effective.status();
        Ok(ResolvedPage {
            page: effective.entity,
            components,
            states: effective.states,
            status,
        })
    }

    /// Drop `keys` from the page's components and delete them
    fn release(&self, business_unit_key: &str, page: &mut Page, keys: Vec<String>) {
        if keys.is_empty() {
            return;
        }
        for key in &keys {
            page.remove_component(key);
        }
        self.cascade_delete_components(business_unit_key, &keys);
    }

    fn release_dropped(&self, business_unit_key: &str, before: &Page, after: &Page) {
        let dropped: Vec<String> = before
            .components
            .iter()
            .filter(|key| !after.has_component(key))
            .cloned()
            .collect();
        if !dropped.is_empty() {
            self.cascade_delete_components(business_unit_key, &dropped);
        }
    }

    fn check_occupancy(&self, occupied: bool, row_id: &str, cell_id: &str) -> ContentResult<()> {
        if occupied && self.config.reject_occupied_cells {
            return Err(ContentError::Conflict(format!(
                "cell {} in row {} is occupied",
                cell_id, row_id
            )));
        }
        Ok(())
    }

    fn require_component(page: &Page, component_key: &str) -> ContentResult<()> {
        if !page.has_component(component_key) {
            return Err(ContentError::not_found(format!(
                "{} {} on page {}",
                PAGE_COMPONENT, component_key, page.key
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompositionConfig;
    use crate::store::{InMemoryObjectStore, ObjectStore};
    use std::sync::Arc;

    fn setup(config: CompositionConfig) -> (Arc<InMemoryObjectStore>, CompositionService) {
        let store = Arc::new(InMemoryObjectStore::new());
        let service = CompositionService::new(store.clone(), config);
        (store, service)
    }

    fn first_cells(page: &Page, n: usize) -> (String, Vec<String>) {
        let row = &page.layout.rows[0];
        (row.id.clone(), row.cells.iter().take(n).map(|c| c.id.clone()).collect())
    }

    #[test]
    fn test_create_page_has_one_empty_row() {
        let (_, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();

        assert_eq!(page.layout.rows.len(), 1);
        assert_eq!(page.layout.rows[0].cells.len(), 12);
        assert!(page.components.is_empty());
        assert_eq!(service.pages().fetch_states("biz", &page.key).unwrap().status(), Status::Draft);
        assert_eq!(service.pages().fetch_versions("biz", &page.key).unwrap().len(), 1);
    }

    #[test]
    fn test_create_page_requires_business_unit() {
        let (_, service) = setup(CompositionConfig::default());
        let err = service.create_page("", NewPage::default()).unwrap_err();
        assert!(matches!(err, ContentError::InvalidRequest(_)));
    }

    #[test]
    fn test_business_unit_with_separator_is_bad_request() {
        let (store, service) = setup(CompositionConfig::default());
        let err = service.create_page("a_b", NewPage::default()).unwrap_err();
        assert!(matches!(err, ContentError::InvalidRequest(_)));
        assert_eq!(err.status_code(), 400);
        assert!(store.is_empty("pages"));
        assert_eq!(service.get_page("a_b", "c").unwrap_err().status_code(), 400);
    }

    #[test]
    fn test_column_count_comes_from_config() {
        let config = CompositionConfig {
            column_count: 6,
            ..Default::default()
        };
        let (_, service) = setup(config);
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let page = service.add_row_to_page("biz", &page.key, None).unwrap();
        assert!(page.layout.rows.iter().all(|r| r.total_span() == 6));
    }

    #[test]
    fn test_add_component_to_unknown_cell() {
        let (_, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, _) = first_cells(&page, 0);

        let err = service
            .add_component_to_cell("biz", &page.key, "hero", &row, "nope")
            .unwrap_err();
        assert!(err.is_not_found());
        let err = service
            .add_component_to_cell("biz", &page.key, "hero", "nope", "nope")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_overwriting_a_cell_deletes_previous_component() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 1);

        let first = service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();
        let second = service.add_component_to_cell("biz", &page.key, "text", &row, &cells[0]).unwrap();

        assert_eq!(second.page.components, vec![second.component.key.clone()]);
        assert_eq!(store.len("page-components"), 1);
        assert!(store
            .get("page-components", &format!("biz_{}", first.component.key))
            .is_err());
    }

    #[test]
    fn test_occupied_cell_rejected_when_configured() {
        let config = CompositionConfig {
            reject_occupied_cells: true,
            ..Default::default()
        };
        let (store, service) = setup(config);
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 1);
        service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();

        let err = service
            .add_component_to_cell("biz", &page.key, "text", &row, &cells[0])
            .unwrap_err();
        assert!(matches!(err, ContentError::Conflict(_)));
        assert_eq!(store.len("page-components"), 1);
    }

    #[test]
    fn test_remove_row_cascades_components() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 2);
        service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();
        service.add_component_to_cell("biz", &page.key, "text", &row, &cells[1]).unwrap();
        service.add_row_to_page("biz", &page.key, None).unwrap();

        let page = service.remove_row_from_page("biz", &page.key, &row).unwrap();

        assert_eq!(page.layout.rows.len(), 1);
        assert!(page.components.is_empty());
        assert!(store.is_empty("page-components"));
    }

    #[test]
    fn test_move_component() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 3);
        let a = service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();
        let b = service.add_component_to_cell("biz", &page.key, "text", &row, &cells[2]).unwrap();

        let moved = service
            .move_component_in_page("biz", &page.key, &a.component.key, &row, &cells[1])
            .unwrap();
        assert_eq!(moved.layout.cell(&row, &cells[0]).unwrap().content_item_key, None);
        assert_eq!(
            moved.layout.cell(&row, &cells[1]).unwrap().content_item_key.as_deref(),
            Some(a.component.key.as_str())
        );

        // Moving onto an occupied cell replaces and deletes its component.
        let moved = service
            .move_component_in_page("biz", &page.key, &a.component.key, &row, &cells[2])
            .unwrap();
        assert_eq!(moved.components, vec![a.component.key.clone()]);
        assert!(store
            .get("page-components", &format!("biz_{}", b.component.key))
            .is_err());
    }

    #[test]
    fn test_update_component_in_page() {
        let (_, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 1);
        let placed = service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();

        let updated = service
            .update_component_in_page(
                "biz",
                &page.key,
                &placed.component.key,
                ContentItemUpdate {
                    name: Some("Big hero".into()),
                    properties: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("Big hero"));

        let resolved = service.get_page_with_states("biz", &page.key).unwrap();
        assert_eq!(resolved.components[0].name.as_deref(), Some("Big hero"));
        assert_eq!(service.pages().fetch_versions("biz", &page.key).unwrap().len(), 3);
    }

    #[test]
    fn test_unknown_component_is_not_found() {
        let (_, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        assert!(service
            .remove_component_from_page("biz", &page.key, "ghost")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_page_with_states_skips_dangling_components() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 2);
        let a = service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();
        let b = service.add_component_to_cell("biz", &page.key, "text", &row, &cells[1]).unwrap();
        store
            .delete("page-components", &format!("biz_{}", a.component.key))
            .unwrap();

        let resolved = service.get_page_with_states("biz", &page.key).unwrap();
        assert_eq!(resolved.page.components.len(), 2);
        assert_eq!(resolved.components, vec![b.component]);
    }

    #[test]
    fn test_restore_version_deletes_components_it_drops() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 1);
        let first_version = service.pages().fetch_versions("biz", &page.key).unwrap().versions[0].id;
        service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();
        assert_eq!(store.len("page-components"), 1);

        let restored = service.restore_page_version("biz", &page.key, &first_version).unwrap();
        assert!(restored.components.is_empty());
        assert!(store.is_empty("page-components"));

        service.delete_page("biz", &page.key).unwrap();
        assert!(store.is_empty("page-components"));
    }

    #[test]
    fn test_restore_keeps_components_still_referenced() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 2);
        let hero = service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();
        let with_hero = service.pages().fetch_versions("biz", &page.key).unwrap().versions[0].id;
        service.add_component_to_cell("biz", &page.key, "text", &row, &cells[1]).unwrap();

        let restored = service.restore_page_version("biz", &page.key, &with_hero).unwrap();
        assert_eq!(restored.components, vec![hero.component.key.clone()]);
        assert_eq!(store.len("page-components"), 1);
        assert!(service.components.get("biz", &hero.component.key).is_ok());
    }

    #[test]
    fn test_revert_deletes_components_added_after_publish() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        service.pages().publish_current("biz", &page.key, true).unwrap();
        let (row, cells) = first_cells(&page, 1);
        service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();

        let reverted = service.revert_page_to_published("biz", &page.key).unwrap();
        assert!(reverted.components.is_empty());
        assert!(store.is_empty("page-components"));

        service.delete_page("biz", &page.key).unwrap();
        assert!(store.is_empty("page-components"));
    }

    #[test]
    fn test_revert_without_published_keeps_components() {
        let (store, service) = setup(CompositionConfig::default());
        let page = service.create_page("biz", NewPage::default()).unwrap();
        let (row, cells) = first_cells(&page, 1);
        service.add_component_to_cell("biz", &page.key, "hero", &row, &cells[0]).unwrap();

        let err = service.revert_page_to_published("biz", &page.key).unwrap_err();
        assert!(matches!(err, ContentError::NoPublishedState(_)));
        assert_eq!(store.len("page-components"), 1);
    }

    #[test]
    fn test_list_pages() {
        let (_, service) = setup(CompositionConfig::default());
        service.create_page("biz", NewPage::default()).unwrap();
        service.create_page("biz", NewPage::default()).unwrap();
        service.create_page("other", NewPage::default()).unwrap();
        assert_eq!(service.list_pages("biz").unwrap().len(), 2);
    }
}
