//! Error taxonomy for palette sorting.

use thiserror::Error;

use crate::color::Color;
use crate::store::StoreError;

/// Failures raised by sort operations. All surface synchronously to the
/// caller; nothing is retried internally. A mid-operation failure leaves
/// already-written rows in their new state.
#[derive(Debug, Error)]
pub enum SortError {
    /// Slice text does not match `[START]:[NROWS][,[LENGTH]]`.
    #[error("slice expression {expr:?} not understood")]
    InvalidSliceExpression { expr: String },

    /// The slice asks for more entries than the palette holds.
    #[error("slice needs {needed} entries but palette has {available}")]
    InsufficientEntries { needed: usize, available: usize },

    /// Autoslice endpoint color is absent from the palette.
    #[error("color {color} not found in palette")]
    ColorNotFound { color: Color },

    /// Autoslice endpoint color occurs more than once.
    #[error("color {color} appears {occurrences} times in palette, endpoint is ambiguous")]
    AmbiguousEndpoint { color: Color, occurrences: usize },

    /// Autoslice row count does not evenly divide the endpoint span.
    #[error("{nrows} rows do not evenly divide a span of {span} entries")]
    UnevenDivision { nrows: usize, span: usize },

    /// Operation name missing from the command table.
    #[error("unknown operation {name:?}")]
    UnknownOperation { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
