//! Rows and cells of a page layout.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{GridError, GridResult};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single grid cell, optionally holding a content item reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub id: String,

    #[serde(default)]
    pub content_item_key: Option<String>,

    pub col_span: u32,
}

impl GridCell {
    /// An unoccupied cell of span 1
    pub fn empty() -> Self {
        Self {
            id: new_id(),
            content_item_key: None,
            col_span: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content_item_key.is_none()
    }
}

/// An ordered run of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub id: String,
    pub cells: Vec<GridCell>,
}

impl GridRow {
    /// A fresh row of `column_count` empty cells, each spanning one column.
    ///
    /// Right after creation the spans sum to `column_count`.
    pub fn empty(column_count: u32) -> Self {
        Self {
            id: new_id(),
            cells: (0..column_count).map(|_| GridCell::empty()).collect(),
        }
    }

    /// Sum of all cell spans
    pub fn total_span(&self) -> u32 {
        self.cells.iter().map(|c| c.col_span).sum()
    }

    pub(super) fn cell_index(&self, cell_id: &str) -> GridResult<usize> {
        self.cells
            .iter()
            .position(|c| c.id == cell_id)
            .ok_or_else(|| GridError::CellNotFound {
                row_id: self.id.clone(),
                cell_id: cell_id.to_string(),
            })
    }

    pub fn cell(&self, cell_id: &str) -> GridResult<&GridCell> {
        let idx = self.cell_index(cell_id)?;
        Ok(&self.cells[idx])
    }

    fn cell_mut(&mut self, cell_id: &str) -> GridResult<&mut GridCell> {
        let idx = self.cell_index(cell_id)?;
        Ok(&mut self.cells[idx])
    }

    fn referenced_keys(&self) -> impl Iterator<Item = &String> {
        self.cells.iter().filter_map(|c| c.content_item_key.as_ref())
    }
}

/// Page layout: rows from top to bottom
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: Vec<GridRow>,
}

impl Layout {
    /// A layout holding a single empty row
    pub fn with_empty_row(column_count: u32) -> Self {
        Self {
            rows: vec![GridRow::empty(column_count)],
        }
    }

    pub fn row(&self, row_id: &str) -> GridResult<&GridRow> {
        self.rows
            .iter()
            .find(|r| r.id == row_id)
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()))
    }

    pub(super) fn row_mut(&mut self, row_id: &str) -> GridResult<&mut GridRow> {
        self.rows
            .iter_mut()
            .find(|r| r.id == row_id)
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()))
    }

    /// Look up a cell, failing `RowNotFound` / `CellNotFound`
    pub fn cell(&self, row_id: &str, cell_id: &str) -> GridResult<&GridCell> {
        self.row(row_id)?.cell(cell_id)
    }

    /// Insert a new empty row at `at_index`, or append it. Returns the row id.
    pub fn add_row(&mut self, column_count: u32, at_index: Option<usize>) -> GridResult<String> {
        let row = GridRow::empty(column_count);
        let id = row.id.clone();
        match at_index {
            Some(index) if index > self.rows.len() => {
                return Err(GridError::RowIndexOutOfBounds {
                    index,
                    len: self.rows.len(),
                })
            }
            Some(index) => self.rows.insert(index, row),
            None => self.rows.push(row),
        }
        Ok(id)
    }

    /// Remove a row, returning the content item keys its cells referenced.
    ///
    /// The caller owns cascading the deletion of those items.
    pub fn remove_row(&mut self, row_id: &str) -> GridResult<Vec<String>> {
        let idx = self
            .rows
            .iter()
            .position(|r| r.id == row_id)
            .ok_or_else(|| GridError::RowNotFound(row_id.to_string()))?;
        let row = self.rows.remove(idx);
        Ok(row.referenced_keys().cloned().collect())
    }

    /// Point a cell at a content item, returning the key it previously held
    pub fn set_cell_component(
        &mut self,
        row_id: &str,
        cell_id: &str,
        content_item_key: impl Into<String>,
    ) -> GridResult<Option<String>> {
        let cell = self.row_mut(row_id)?.cell_mut(cell_id)?;
        Ok(cell.content_item_key.replace(content_item_key.into()))
    }

    /// Empty a cell, returning the key it previously held
    pub fn clear_cell_component(&mut self, row_id: &str, cell_id: &str) -> GridResult<Option<String>> {
        let cell = self.row_mut(row_id)?.cell_mut(cell_id)?;
        Ok(cell.content_item_key.take())
    }

    /// Locate the cell referencing `content_item_key` as `(row_id, cell_id)`
    pub fn find_component(&self, content_item_key: &str) -> Option<(String, String)> {
        self.rows.iter().find_map(|row| {
            row.cells
                .iter()
                .find(|c| c.content_item_key.as_deref() == Some(content_item_key))
                .map(|c| (row.id.clone(), c.id.clone()))
        })
    }

    /// Every content item key referenced anywhere in the layout, top to bottom
    pub fn referenced_keys(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|r| r.referenced_keys().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied_row() -> (Layout, String) {
        let mut layout = Layout::with_empty_row(12);
        let row_id = layout.rows[0].id.clone();
        let c0 = layout.rows[0].cells[0].id.clone();
        let c5 = layout.rows[0].cells[5].id.clone();
        layout.set_cell_component(&row_id, &c0, "item-a").unwrap();
        layout.set_cell_component(&row_id, &c5, "item-b").unwrap();
        (layout, row_id)
    }

    #[test]
    fn test_empty_row_spans_column_count() {
        for n in [1u32, 4, 12, 24] {
            let row = GridRow::empty(n);
            assert_eq!(row.cells.len(), n as usize);
            assert!(row.cells.iter().all(|c| c.col_span == 1 && c.is_empty()));
            assert_eq!(row.total_span(), n);
        }
    }

    #[test]
    fn test_cell_ids_are_unique() {
        let row = GridRow::empty(12);
        let mut ids: Vec<_> = row.cells.iter().map(|c| c.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_add_row_appends_and_inserts() {
        let mut layout = Layout::with_empty_row(12);
        let first = layout.rows[0].id.clone();

        let appended = layout.add_row(12, None).unwrap();
        let inserted = layout.add_row(12, Some(0)).unwrap();

        let order: Vec<_> = layout.rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(order, vec![inserted, first, appended]);
    }

    #[test]
    fn test_add_row_out_of_bounds() {
        let mut layout = Layout::default();
        let err = layout.add_row(12, Some(1)).unwrap_err();
        assert_eq!(err, GridError::RowIndexOutOfBounds { index: 1, len: 0 });
    }

    #[test]
    fn test_remove_row_returns_referenced_keys() {
        let (mut layout, row_id) = occupied_row();
        layout.add_row(12, None).unwrap();

        let removed = layout.remove_row(&row_id).unwrap();

        assert_eq!(removed, vec!["item-a".to_string(), "item-b".to_string()]);
        assert_eq!(layout.rows.len(), 1);
        assert!(layout.referenced_keys().is_empty());
        assert!(layout.find_component("item-a").is_none());
    }

    #[test]
    fn test_remove_missing_row() {
        let mut layout = Layout::with_empty_row(12);
        assert_eq!(
            layout.remove_row("nope").unwrap_err(),
            GridError::RowNotFound("nope".into())
        );
    }

    #[test]
    fn test_set_cell_returns_previous_key() {
        let (mut layout, row_id) = occupied_row();
        let c0 = layout.rows[0].cells[0].id.clone();

        let previous = layout.set_cell_component(&row_id, &c0, "item-c").unwrap();

        assert_eq!(previous.as_deref(), Some("item-a"));
        assert_eq!(layout.cell(&row_id, &c0).unwrap().content_item_key.as_deref(), Some("item-c"));
    }

    #[test]
    fn test_clear_cell() {
        let (mut layout, row_id) = occupied_row();
        let c0 = layout.rows[0].cells[0].id.clone();

        assert_eq!(layout.clear_cell_component(&row_id, &c0).unwrap().as_deref(), Some("item-a"));
        assert_eq!(layout.clear_cell_component(&row_id, &c0).unwrap(), None);
    }

    #[test]
    fn test_missing_cell() {
        let (mut layout, row_id) = occupied_row();
        let err = layout.set_cell_component(&row_id, "nope", "x").unwrap_err();
        assert!(matches!(err, GridError::CellNotFound { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_component() {
        let (layout, row_id) = occupied_row();
        let c5 = layout.rows[0].cells[5].id.clone();
        assert_eq!(layout.find_component("item-b"), Some((row_id, c5)));
    }

    #[test]
    fn test_serde_field_names() {
        let cell = GridCell {
            id: "c".into(),
            content_item_key: Some("k".into()),
            col_span: 3,
        };
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["contentItemKey"], "k");
        assert_eq!(json["colSpan"], 3);
    }
}
