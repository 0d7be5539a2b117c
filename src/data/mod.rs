/// Data layer: core types, loading, filtering and description.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  named typed columns (text / float)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter  │   │   info   │
///   └──────────┘   └──────────┘
///   predicates →     column summary
///   new Dataset      + head
/// ```

pub mod error;
pub mod filter;
pub mod info;
pub mod loader;
pub mod model;

pub use error::SchemaError;
pub use filter::{filter, filter_mask, FilterReport, FilterSpec, RangeFilter};
pub use model::{Column, ColumnType, Dataset, Row, Value};
