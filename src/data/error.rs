use thiserror::Error;

use super::model::ColumnType;

/// Structural problems with a [`Dataset`](super::model::Dataset).
///
/// Raised when a dataset is assembled from mismatched columns, or when an
/// engine asks for a column that is absent or carries the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    #[error("column '{column}' holds {found} values, expected {expected}")]
    ColumnType {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
}
