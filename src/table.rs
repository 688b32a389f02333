use std::collections::BTreeMap;

use thiserror::Error;

use crate::dimension::Quantity;

/// One summed counter cell of a histogram bucket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Counter {
    Int(u64),
    Float(f64),
}

impl Counter {
    pub fn as_f64(self) -> f64 {
        match self {
            Counter::Int(v) => v as f64,
            Counter::Float(v) => v,
        }
    }

    fn is_valid(self) -> bool {
        match self {
            Counter::Int(_) => true,
            Counter::Float(v) => v.is_finite() && v >= 0.0,
        }
    }
}

impl From<u64> for Counter {
    fn from(v: u64) -> Self {
        Counter::Int(v)
    }
}

impl From<f64> for Counter {
    fn from(v: f64) -> Self {
        Counter::Float(v)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TableError {
    #[error("bucket key {key} at row {row} is not a finite non-negative number")]
    InvalidKey { row: usize, key: f64 },
    #[error("bucket key {key} at row {row} is not greater than the previous key")]
    UnsortedKeys { row: usize, key: f64 },
    #[error("column {column} has {found} values, expected {expected}")]
    ColumnLength { column: String, expected: usize, found: usize },
    #[error("column {column} row {row} holds invalid counter {value}")]
    InvalidCounter { column: String, row: usize, value: f64 },
}

/// Histogram rows keyed by bucket, stored column by column.
///
/// Keys are strictly ascending, which the cumulative sums of the distribution summary
/// rely on. A column that is absent was not collected; it is never read as zeros.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedTable {
    keys: Vec<f64>,
    columns: BTreeMap<String, Vec<Counter>>,
}

impl AggregatedTable {
    pub fn new(
        keys: Vec<f64>,
        columns: BTreeMap<String, Vec<Counter>>,
    ) -> Result<AggregatedTable, TableError> {
        for (row, &key) in keys.iter().enumerate() {
            if !key.is_finite() || key < 0.0 {
                return Err(TableError::InvalidKey { row, key });
            }
            if row > 0 && key <= keys[row - 1] {
                return Err(TableError::UnsortedKeys { row, key });
            }
        }
        for (name, values) in columns.iter() {
            if values.len() != keys.len() {
                return Err(TableError::ColumnLength {
                    column: name.clone(),
                    expected: keys.len(),
                    found: values.len(),
                });
            }
            if let Some(row) = values.iter().position(|c| !c.is_valid()) {
                return Err(TableError::InvalidCounter {
                    column: name.clone(),
                    row,
                    value: values[row].as_f64(),
                });
            }
        }
        Ok(AggregatedTable { keys, columns })
    }

    /// Builds a table from rows laid out as `names`.
    pub fn from_rows<C>(names: &[&str], rows: Vec<(f64, Vec<C>)>) -> Result<Self, TableError>
    where
        C: Into<Counter>,
    {
        let mut keys: Vec<f64> = Vec::with_capacity(rows.len());
        let mut columns: BTreeMap<String, Vec<Counter>> =
            names.iter().map(|n| (n.to_string(), Vec::with_capacity(rows.len()))).collect();
        for (key, values) in rows {
            let found = values.len();
            if found != names.len() {
                return Err(TableError::ColumnLength {
                    column: format!("row {}", keys.len()),
                    expected: names.len(),
                    found,
                });
            }
            for (name, value) in names.iter().zip(values) {
                if let Some(column) = columns.get_mut(*name) {
                    column.push(value.into());
                }
            }
            keys.push(key);
        }
        AggregatedTable::new(keys, columns)
    }

    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&[Counter]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn quantity(&self, quantity: Quantity) -> Option<&[Counter]> {
        self.column(quantity.column())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
