use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – string columns become text, numeric columns become float
/// * `.json`    – `[{ "cut": "Ideal", "price": 326, ... }, ...]`
/// * `.csv`     – header row, one column per field
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows with columns {:?}",
        dataset.len(),
        dataset.column_names()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Type inference shared by the text-based formats
// ---------------------------------------------------------------------------

/// A column is numeric when every present cell parses as a float;
/// otherwise all cells are kept as text. Missing cells stay missing.
fn infer_column(cells: Vec<Option<String>>) -> Column {
    let numbers: Option<Vec<f64>> = cells
        .iter()
        .map(|c| match c {
            None => Some(f64::NAN),
            Some(s) => s.trim().parse::<f64>().ok(),
        })
        .collect();

    match numbers {
        Some(values) => Column::Float(values),
        None => Column::Text(cells),
    }
}

fn assemble(headers: Vec<String>, cells: Vec<Vec<Option<String>>>) -> Result<Dataset> {
    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, column)| (name, infer_column(column)))
        .collect();
    Ok(Dataset::new(columns)?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "carat": 0.23, "cut": "Ideal", "color": "E", "clarity": "SI2", "price": 326 },
///   ...
/// ]
/// ```
///
/// Keys absent from a record, and explicit `null`s, are missing cells.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    // Column order follows first appearance.
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut cells: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(records.len()); headers.len()];
    for rec in records {
        for (col, name) in headers.iter().enumerate() {
            cells[col].push(rec.get(name).and_then(json_to_cell));
        }
    }

    assemble(headers, cells)
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Empty fields are missing cells.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col, value) in record.iter().enumerate() {
            let cell = (!value.is_empty()).then(|| value.to_string());
            cells[col].push(cell);
        }
    }

    assemble(headers, cells)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas, Polars or Arrow.
///
/// Numeric columns (integers, floats, decimals) become float columns; every
/// other type is cast to a string and kept as text.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<(String, Column)> = schema
        .fields()
        .iter()
        .map(|f| {
            let empty = if f.data_type().is_numeric() {
                Column::Float(Vec::new())
            } else {
                Column::Text(Vec::new())
            };
            (f.name().clone(), empty)
        })
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (idx, (name, column)) in columns.iter_mut().enumerate() {
            append_arrow(column, batch.column(idx).as_ref())
                .with_context(|| format!("reading column '{name}'"))?;
        }
    }

    Ok(Dataset::new(columns)?)
}

/// Append an Arrow array to an accumulating column, casting as needed.
fn append_arrow(column: &mut Column, array: &dyn Array) -> Result<()> {
    match column {
        Column::Float(values) => {
            let cast_arr = cast(array, &DataType::Float64).context("casting to Float64")?;
            let floats = cast_arr.as_primitive::<Float64Type>();
            values.extend(floats.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        Column::Text(values) => {
            let cast_arr = cast(array, &DataType::Utf8).context("casting to Utf8")?;
            let strings = cast_arr.as_string::<i32>();
            values.extend(strings.iter().map(|v| v.map(str::to_string)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::ColumnType;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_infers_column_types() {
        let file = write_temp(
            ".csv",
            "carat,cut,price\n0.23,Ideal,326\n0.21,,326\n,Good,\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("carat").unwrap().column_type(), ColumnType::Float);
        assert_eq!(ds.column("cut").unwrap().column_type(), ColumnType::Text);
        assert_eq!(ds.text("cut").unwrap()[1], None);
        assert!(ds.float("price").unwrap()[2].is_nan());
        assert_eq!(ds.column_names(), &["carat", "cut", "price"]);
    }

    #[test]
    fn csv_column_with_any_text_stays_text() {
        let file = write_temp(".csv", "clarity\n1\nSI1\n");
        let ds = load_file(file.path()).unwrap();
        assert_eq!(
            ds.text("clarity").unwrap(),
            &[Some("1".to_string()), Some("SI1".to_string())]
        );
    }

    #[test]
    fn json_records_become_columns() {
        let file = write_temp(
            ".json",
            r#"[{"cut": "Ideal", "price": 326}, {"cut": "Good", "price": null, "color": "E"}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.column_names(), &["cut", "price", "color"]);
        assert_eq!(ds.text("color").unwrap(), &[None, Some("E".to_string())]);
        let price = ds.float("price").unwrap();
        assert_eq!(price[0], 326.0);
        assert!(price[1].is_nan());
    }

    #[test]
    fn json_rejects_non_array() {
        let file = write_temp(".json", r#"{"cut": "Ideal"}"#);
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn parquet_round_trip() {
        let ds = Dataset::new(vec![
            ("cut".into(), Column::text(["Ideal", "Premium"])),
            ("price".into(), Column::float(vec![326.0, f64::NAN])),
        ])
        .unwrap();
        let batch = ds.to_record_batch().unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer =
            parquet::arrow::ArrowWriter::try_new(file.reopen().unwrap(), batch.schema(), None)
                .unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let loaded = load_file(file.path()).unwrap();
        assert_eq!(loaded.text("cut").unwrap(), ds.text("cut").unwrap());
        let price = loaded.float("price").unwrap();
        assert_eq!(price[0], 326.0);
        assert!(price[1].is_nan());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }
}
