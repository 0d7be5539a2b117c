//! Filtering and summary insights for tabular diamond datasets.
//!
//! [`data`] owns the columnar [`Dataset`](data::Dataset), its loaders and
//! the filter engine; [`insight`] derives the headline statistics;
//! [`session`] keeps the caller-side "current dataset" state.

pub mod data;
pub mod insight;
pub mod session;
