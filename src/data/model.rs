use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use super::error::SchemaError;

/// Column names of the diamonds schema the engines work against.
pub mod columns {
    pub const CUT: &str = "cut";
    pub const COLOR: &str = "color";
    pub const CLARITY: &str = "clarity";
    pub const CARAT: &str = "carat";
    pub const PRICE: &str = "price";
}

// ---------------------------------------------------------------------------
// Value – a borrowed view of a single cell
// ---------------------------------------------------------------------------

/// One cell of a [`Dataset`], borrowed from its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Float(f64),
    Null,
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl<'a> Value<'a> {
    /// Numeric view of the cell, `None` for text and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – homogeneous, typed storage for one named column
// ---------------------------------------------------------------------------

/// The two column types a dataset can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Float,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Float => write!(f, "float"),
        }
    }
}

/// Column storage. Missing text cells are `None`, missing numbers are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<Option<String>>),
    Float(Vec<f64>),
}

impl Column {
    /// Build a text column with no missing cells.
    pub fn text<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Text(values.into_iter().map(|s| Some(s.into())).collect())
    }

    pub fn float(values: impl Into<Vec<f64>>) -> Self {
        Column::Float(values.into())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Text(_) => ColumnType::Text,
            Column::Float(_) => ColumnType::Float,
        }
    }

    /// Number of cells that are not missing.
    pub fn non_null_count(&self) -> usize {
        match self {
            Column::Text(v) => v.iter().filter(|c| c.is_some()).count(),
            Column::Float(v) => v.iter().filter(|c| !c.is_nan()).count(),
        }
    }

    /// Cell at `row`, or `None` past the end.
    pub fn get(&self, row: usize) -> Option<Value<'_>> {
        match self {
            Column::Text(v) => v
                .get(row)
                .map(|c| c.as_deref().map_or(Value::Null, Value::Text)),
            Column::Float(v) => v
                .get(row)
                .map(|&c| if c.is_nan() { Value::Null } else { Value::Float(c) }),
        }
    }

    /// Copy out the cells whose mask bit is set, keeping their order.
    fn take(&self, mask: &[bool]) -> Column {
        fn pick<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| v.clone())
                .collect()
        }
        match self {
            Column::Text(v) => Column::Text(pick(v, mask)),
            Column::Float(v) => Column::Float(pick(v, mask)),
        }
    }

    fn to_arrow(&self) -> ArrayRef {
        match self {
            Column::Text(v) => Arc::new(StringArray::from(
                v.iter().map(|c| c.as_deref()).collect::<Vec<_>>(),
            )),
            Column::Float(v) => Arc::new(Float64Array::from(
                v.iter()
                    .map(|&c| if c.is_nan() { None } else { Some(c) })
                    .collect::<Vec<_>>(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – an ordered set of equally long, named columns
// ---------------------------------------------------------------------------

/// In-memory columnar table.
///
/// Engines only ever read a `Dataset`; every transformation produces a new
/// one, so a single instance can be shared across threads by reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Column names in insertion order.
    column_names: Vec<String>,
    columns: BTreeMap<String, Column>,
    n_rows: usize,
}

impl Dataset {
    /// Assemble a dataset, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self, SchemaError> {
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        let mut column_names = Vec::with_capacity(columns.len());
        let mut by_name = BTreeMap::new();

        for (name, column) in columns {
            if column.len() != n_rows {
                return Err(SchemaError::LengthMismatch {
                    column: name,
                    expected: n_rows,
                    found: column.len(),
                });
            }
            if by_name.contains_key(&name) {
                return Err(SchemaError::DuplicateColumn(name));
            }
            column_names.push(name.clone());
            by_name.insert(name, column);
        }

        Ok(Dataset {
            column_names,
            columns: by_name,
            n_rows,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Result<&Column, SchemaError> {
        self.columns
            .get(name)
            .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.column_names
            .iter()
            .filter_map(|name| self.columns.get(name).map(|c| (name.as_str(), c)))
    }

    /// Typed access to a text column.
    pub fn text(&self, name: &str) -> Result<&[Option<String>], SchemaError> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            other => Err(SchemaError::ColumnType {
                column: name.to_string(),
                expected: ColumnType::Text,
                found: other.column_type(),
            }),
        }
    }

    /// Typed access to a float column.
    pub fn float(&self, name: &str) -> Result<&[f64], SchemaError> {
        match self.column(name)? {
            Column::Float(v) => Ok(v),
            other => Err(SchemaError::ColumnType {
                column: name.to_string(),
                expected: ColumnType::Float,
                found: other.column_type(),
            }),
        }
    }

    /// Sorted distinct non-missing values of a text column.
    pub fn unique_text(&self, name: &str) -> Result<BTreeSet<String>, SchemaError> {
        Ok(self.text(name)?.iter().flatten().cloned().collect())
    }

    /// `(min, max)` of a float column ignoring `NaN`; `None` if nothing is left.
    pub fn float_bounds(&self, name: &str) -> Result<Option<(f64, f64)>, SchemaError> {
        let bounds = self
            .float(name)?
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
        Ok(bounds)
    }

    /// New dataset holding the rows whose mask bit is set, order preserved.
    pub fn take(&self, mask: &[bool]) -> Dataset {
        let columns: BTreeMap<String, Column> = self
            .columns
            .iter()
            .map(|(name, col)| (name.clone(), col.take(mask)))
            .collect();
        let n_rows = mask.iter().take(self.n_rows).filter(|&&keep| keep).count();
        Dataset {
            column_names: self.column_names.clone(),
            columns,
            n_rows,
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        let mask: Vec<bool> = (0..self.n_rows).map(|i| i < n).collect();
        self.take(&mask)
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.n_rows).map(move |index| Row {
            dataset: self,
            index,
        })
    }

    /// Convert to an Arrow record batch (`Utf8` / `Float64` columns).
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let mut fields = Vec::with_capacity(self.column_names.len());
        let mut arrays = Vec::with_capacity(self.column_names.len());
        for (name, col) in self.columns() {
            let dtype = match col.column_type() {
                ColumnType::Text => DataType::Utf8,
                ColumnType::Float => DataType::Float64,
            };
            fields.push(Field::new(name, dtype, true));
            arrays.push(col.to_arrow());
        }
        let options = RecordBatchOptions::new().with_row_count(Some(self.n_rows));
        RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
    }
}

// ---------------------------------------------------------------------------
// Row – a borrowed view of one row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of this row in its dataset.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell in the named column, `None` if the column does not exist.
    pub fn get(&self, column: &str) -> Option<Value<'a>> {
        self.dataset.columns.get(column)?.get(self.index)
    }

    /// `(column, value)` pairs in column order.
    pub fn values(&self) -> impl Iterator<Item = (&'a str, Value<'a>)> + 'a {
        let dataset = self.dataset;
        let index = self.index;
        dataset
            .columns()
            .filter_map(move |(name, col)| col.get(index).map(|v| (name, v)))
    }
}
