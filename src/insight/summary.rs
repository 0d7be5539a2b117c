use std::fmt;

use crate::data::model::columns::{CARAT, CLARITY, COLOR, CUT, PRICE};
use crate::data::{Dataset, SchemaError};

use super::format::{round_to, thousands, NOT_AVAILABLE};
use super::stats::{arg_max, group_by, pearson, quantiles, value_shares};

pub const LABEL_NO_DATA: &str = "No data";
pub const LABEL_WEIGHT: &str = "Diamond weight (carat)";
pub const LABEL_CUT: &str = "Cut";
pub const LABEL_COLOR: &str = "Color";
pub const LABEL_CLARITY: &str = "Clarity";
pub const LABEL_PRICE_RANGE: &str = "Price range";

/// How many of the most frequent categories are listed.
const TOP_SHARES: usize = 3;

// ---------------------------------------------------------------------------
// InsightRow
// ---------------------------------------------------------------------------

/// A named statistic and its formatted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightRow {
    pub label: String,
    pub value: String,
}

impl InsightRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        InsightRow {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl From<InsightRow> for (String, String) {
    fn from(row: InsightRow) -> Self {
        (row.label, row.value)
    }
}

impl fmt::Display for InsightRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Derive the five headline statistics of a diamonds dataset.
///
/// Rows come back in a fixed order: weight/price correlation, cut
/// comparison, color shares, clarity shares, price range. An empty dataset
/// yields the single row `("No data", "")`.
pub fn summarize(dataset: &Dataset) -> Result<Vec<InsightRow>, SchemaError> {
    if dataset.is_empty() {
        return Ok(vec![InsightRow::new(LABEL_NO_DATA, "")]);
    }

    let carat = dataset.float(CARAT)?;
    let price = dataset.float(PRICE)?;
    let cut = dataset.text(CUT)?;
    let color = dataset.text(COLOR)?;
    let clarity = dataset.text(CLARITY)?;

    let rows = vec![
        InsightRow::new(LABEL_WEIGHT, weight_correlation(carat, price)),
        InsightRow::new(LABEL_CUT, cut_comparison(cut, price)),
        InsightRow::new(LABEL_COLOR, top_shares(color, 2)),
        InsightRow::new(LABEL_CLARITY, top_shares(clarity, 0)),
        InsightRow::new(LABEL_PRICE_RANGE, price_range(price)),
    ];
    log::debug!("summarized {} rows", dataset.len());
    Ok(rows)
}

fn weight_correlation(carat: &[f64], price: &[f64]) -> String {
    format!("Correlation with price ≈ {:.3}", pearson(carat, price))
}

/// "{highest-value cut} vs {most common cut} avg: {mean} vs {mean}".
fn cut_comparison(cut: &[Option<String>], price: &[f64]) -> String {
    let groups = group_by(cut, price);

    let Some(common) = arg_max(groups.iter().map(|(k, g)| (*k, g.size as f64))) else {
        return NOT_AVAILABLE.to_string();
    };
    // Every group mean is NaN only when no price is present at all.
    let high = arg_max(groups.iter().map(|(k, g)| (*k, g.mean()))).unwrap_or(common);

    let mean_of = |key: &str| groups.get(key).map_or(f64::NAN, |g| g.mean());
    format!(
        "{high} vs {common} avg: {} vs {}",
        thousands(mean_of(high)),
        thousands(mean_of(common))
    )
}

/// Top categories by share, e.g. "G (20.93%), E (18.16%), F (17.69%)".
fn top_shares(values: &[Option<String>], decimals: i32) -> String {
    let shares = value_shares(values);
    if shares.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    shares
        .into_iter()
        .take(TOP_SHARES)
        .map(|(value, share)| {
            let share = round_to(share, decimals);
            match decimals {
                0 => format!("{value} ({}%)", share as i64),
                d => format!("{value} ({share:.prec$}%)", prec = d as usize),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Interquartile range and median, e.g. "950–5,324 USD (median 2,401)".
fn price_range(price: &[f64]) -> String {
    match quantiles(price, &[0.25, 0.75, 0.5]).as_deref() {
        Some(&[q25, q75, median]) => format!(
            "{}–{} USD (median {})",
            thousands(q25),
            thousands(q75),
            thousands(median)
        ),
        _ => NOT_AVAILABLE.to_string(),
    }
}
