//! # Layout Grid Errors

use thiserror::Error;

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

/// Layout grid errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("Row not found: {0}")]
    RowNotFound(String),

    #[error("Cell not found: {cell_id} in row {row_id}")]
    CellNotFound { row_id: String, cell_id: String },

    #[error("Row index {index} out of bounds (rows: {len})")]
    RowIndexOutOfBounds { index: usize, len: usize },

    #[error("Column span {col_span} outside 1..={column_count}")]
    InvalidColSpan { col_span: u32, column_count: u32 },
}

impl GridError {
    /// Whether the error names an absent row or cell
    pub fn is_not_found(&self) -> bool {
        matches!(self, GridError::RowNotFound(_) | GridError::CellNotFound { .. })
    }
}
