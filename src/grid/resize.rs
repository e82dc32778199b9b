//! Cell resizing and row reflow.
//!
//! Growing a cell with `consume_empty_neighbors` walks the row in index order,
//! skipping the target and any occupied cell, and removes empty cells one at a
//! time until the removed spans add up to at least the growth. The walk stops at
//! the first cell that reaches the threshold, so a wide empty cell can overshoot
//! and leave the row narrower than the column count. If the row runs out of empty
//! cells, everything empty is consumed and the row ends up wider.
//!
//! Neither direction validates the row total afterwards. The requested span is
//! bounded by the grid's column count, and a shrink never fills more columns
//! than that.

use serde::{Deserialize, Serialize};

use super::errors::{GridError, GridResult};
use super::layout::{GridCell, Layout};

/// How neighbouring cells react to a resize
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOptions {
    /// On growth, remove empty cells to make room
    #[serde(default)]
    pub consume_empty_neighbors: bool,

    /// On shrink, fill the freed columns with empty span-1 cells
    #[serde(default)]
    pub split_into_empty: bool,
}

impl ResizeOptions {
    /// Both reflow behaviours enabled
    pub fn reflow() -> Self {
        Self {
            consume_empty_neighbors: true,
            split_into_empty: true,
        }
    }
}

/// Cells removed or inserted by a resize
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResizeOutcome {
    pub removed_cell_ids: Vec<String>,
    pub inserted_cell_ids: Vec<String>,
}

impl Layout {
    /// Change a cell's span to `new_col_span` (within `1..=column_count`),
    /// reflowing its row according to `options`
    pub fn resize_cell(
        &mut self,
        row_id: &str,
        cell_id: &str,
        new_col_span: u32,
        column_count: u32,
        options: ResizeOptions,
    ) -> GridResult<ResizeOutcome> {
        if new_col_span == 0 || new_col_span > column_count {
            return Err(GridError::InvalidColSpan {
                col_span: new_col_span,
                column_count,
            });
        }

        let row = self.row_mut(row_id)?;
        let idx = row.cell_index(cell_id)?;
        let old_col_span = row.cells[idx].col_span;
        row.cells[idx].col_span = new_col_span;

        let mut outcome = ResizeOutcome::default();

        if new_col_span > old_col_span && options.consume_empty_neighbors {
            let needed = new_col_span - old_col_span;
            let mut consumed: u32 = 0;
            for cell in &row.cells {
                if consumed >= needed {
                    break;
                }
                if cell.id == cell_id || !cell.is_empty() {
                    continue;
                }
                consumed = consumed.saturating_add(cell.col_span);
                outcome.removed_cell_ids.push(cell.id.clone());
            }
            row.cells
                .retain(|c| !outcome.removed_cell_ids.contains(&c.id));
        } else if new_col_span < old_col_span && options.split_into_empty {
            let freed = old_col_span.min(column_count) - new_col_span;
            let fillers: Vec<GridCell> = (0..freed)
                .map(|_| GridCell::empty())
                .collect();
            outcome.inserted_cell_ids = fillers.iter().map(|c| c.id.clone()).collect();
            row.cells.splice(idx + 1..idx + 1, fillers);
        }

        Ok(outcome)
    }
}
