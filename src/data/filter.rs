use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::model::columns::{CARAT, CLARITY, COLOR, CUT, PRICE};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Filter predicate: selected categories plus optional numeric ranges
// ---------------------------------------------------------------------------

/// Inclusive numeric range that can be switched on and off.
///
/// The range only applies when it is enabled *and* both bounds are present;
/// anything else is treated as disabled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFilter {
    pub enabled: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    /// An enabled range `[min, max]`.
    pub fn between(min: f64, max: f64) -> Self {
        RangeFilter {
            enabled: true,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Bounds in effect, or `None` if the range does not constrain anything.
    pub fn active_bounds(&self) -> Option<(f64, f64)> {
        if !self.enabled {
            return None;
        }
        Some((self.min?, self.max?))
    }
}

/// Conjunction of per-column predicates.
///
/// An empty category set means "no restriction on this column", not
/// "reject every row".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpec {
    pub cuts: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub clarities: BTreeSet<String>,
    pub carat: RangeFilter,
    pub price: RangeFilter,
}

impl FilterSpec {
    /// Initial spec for a freshly loaded dataset: every category selected,
    /// both ranges disabled but pre-filled with the observed min/max.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, SchemaError> {
        let unique = |column: &str| -> Result<BTreeSet<String>, SchemaError> {
            if dataset.has_column(column) {
                dataset.unique_text(column)
            } else {
                Ok(BTreeSet::new())
            }
        };
        let bounds = |column: &str| -> Result<RangeFilter, SchemaError> {
            if !dataset.has_column(column) {
                return Ok(RangeFilter::default());
            }
            let (min, max) = dataset.float_bounds(column)?.unzip();
            Ok(RangeFilter {
                enabled: false,
                min,
                max,
            })
        };

        Ok(FilterSpec {
            cuts: unique(CUT)?,
            colors: unique(COLOR)?,
            clarities: unique(CLARITY)?,
            carat: bounds(CARAT)?,
            price: bounds(PRICE)?,
        })
    }

    fn categorical(&self) -> [(&'static str, &BTreeSet<String>); 3] {
        [
            (CUT, &self.cuts),
            (COLOR, &self.colors),
            (CLARITY, &self.clarities),
        ]
    }

    fn ranges(&self) -> [(&'static str, &RangeFilter); 2] {
        [(CARAT, &self.carat), (PRICE, &self.price)]
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// A predicate bound to the column it reads.
enum Predicate<'a> {
    Member {
        values: &'a [Option<String>],
        selected: &'a BTreeSet<String>,
    },
    Range {
        values: &'a [f64],
        min: f64,
        max: f64,
    },
}

impl Predicate<'_> {
    fn accepts(&self, row: usize) -> bool {
        match self {
            Predicate::Member { values, selected } => values[row]
                .as_ref()
                .is_some_and(|v| selected.contains(v)),
            // NaN compares false on both sides, so missing numbers drop out.
            Predicate::Range { values, min, max } => {
                let v = values[row];
                v >= *min && v <= *max
            }
        }
    }
}

/// Resolve every active predicate against the dataset's columns.
///
/// Fails before any row is evaluated if an active predicate names a column
/// that is missing or has the wrong type.
fn bind<'a>(dataset: &'a Dataset, spec: &'a FilterSpec) -> Result<Vec<Predicate<'a>>, SchemaError> {
    let mut predicates = Vec::new();

    for (column, selected) in spec.categorical() {
        if selected.is_empty() {
            continue;
        }
        predicates.push(Predicate::Member {
            values: dataset.text(column)?,
            selected,
        });
    }

    for (column, range) in spec.ranges() {
        match range.active_bounds() {
            Some((min, max)) => predicates.push(Predicate::Range {
                values: dataset.float(column)?,
                min,
                max,
            }),
            None if range.enabled => {
                log::debug!("range on '{column}' is missing a bound, skipping it");
            }
            None => {}
        }
    }

    Ok(predicates)
}

/// One inclusion flag per row: `true` when the row satisfies every active
/// predicate.
pub fn filter_mask(dataset: &Dataset, spec: &FilterSpec) -> Result<Vec<bool>, SchemaError> {
    let predicates = bind(dataset, spec)?;
    Ok((0..dataset.len())
        .map(|row| predicates.iter().all(|p| p.accepts(row)))
        .collect())
}

/// Return a new dataset with the rows that pass all active filters, in
/// their original order. The input is left untouched.
pub fn filter(dataset: &Dataset, spec: &FilterSpec) -> Result<Dataset, SchemaError> {
    let mask = filter_mask(dataset, spec)?;
    let filtered = dataset.take(&mask);
    log::debug!("filter kept {} of {} rows", filtered.len(), dataset.len());
    Ok(filtered)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Row counts before and after a filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    pub total: usize,
    pub kept: usize,
}

impl FilterReport {
    pub fn new(original: &Dataset, filtered: &Dataset) -> Self {
        FilterReport {
            total: original.len(),
            kept: filtered.len(),
        }
    }

    /// Share of rows kept, in percent. Zero for an empty input.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.kept as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filtered {} of {} rows ({:.1} %)",
            self.kept,
            self.total,
            self.percent()
        )
    }
}
