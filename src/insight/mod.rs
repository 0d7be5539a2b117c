//! Headline statistics over a diamonds [`Dataset`](crate::data::Dataset).
//!
//! `stats` holds the numeric kernels (correlation, quantiles, group-by,
//! frequency shares), `format` turns numbers into display strings, and
//! `summary` combines both into ordered [`InsightRow`]s.

pub mod format;
pub mod stats;
pub mod summary;

pub use summary::{summarize, InsightRow};
