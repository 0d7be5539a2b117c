use std::fmt::Write;

use arrow::error::ArrowError;
use arrow::util::pretty::pretty_format_batches;

use super::model::Dataset;

/// Rows shown under "Head of data" by default.
pub const DEFAULT_HEAD_ROWS: usize = 5;

/// Text summary of a dataset's structure followed by its first `head` rows.
///
/// ```text
/// 3 rows × 2 columns
///  #  column  non-null  dtype
///  0  cut     3         text
///  1  price   2         float
///
/// Head of data:
/// +-------+-------+
/// | cut   | price |
/// ...
/// ```
pub fn describe(dataset: &Dataset, head: usize) -> Result<String, ArrowError> {
    let mut out = String::new();
    let name_width = dataset
        .column_names()
        .iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max("column".len());

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "{} rows × {} columns",
        dataset.len(),
        dataset.column_names().len()
    );
    let _ = writeln!(out, " #  {:<name_width$}  non-null  dtype", "column");
    for (i, (name, column)) in dataset.columns().enumerate() {
        let _ = writeln!(
            out,
            "{i:>2}  {name:<name_width$}  {:<8}  {}",
            column.non_null_count(),
            column.column_type()
        );
    }

    let batch = dataset.head(head).to_record_batch()?;
    let table = pretty_format_batches(&[batch])?;
    let _ = write!(out, "\nHead of data:\n{table}");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    #[test]
    fn lists_columns_and_head() {
        let ds = Dataset::new(vec![
            ("cut".into(), Column::text(["Ideal", "Premium", "Good"])),
            ("price".into(), Column::float(vec![326.0, f64::NAN, 327.0])),
        ])
        .unwrap();
        let text = describe(&ds, 2).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "3 rows × 2 columns");
        assert_eq!(lines[1], " #  column  non-null  dtype");
        assert_eq!(lines[2], " 0  cut     3         text");
        assert_eq!(lines[3], " 1  price   2         float");
        assert!(text.contains("Head of data:"));
        assert!(text.contains("Premium"));
        assert!(!text.contains("Good"));
    }

    #[test]
    fn empty_dataset_still_describes() {
        let text = describe(&Dataset::default(), DEFAULT_HEAD_ROWS).unwrap();
        assert!(text.starts_with("0 rows × 0 columns"));
    }
}
