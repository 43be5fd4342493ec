use std::{collections::HashMap, path::Path};

use log::info;

use crate::{
    error::{Error, Result},
    row::Row,
};

/// Precomputed key -> candidate-rows mapping, built once ahead of any
/// per-row processing and read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    map: HashMap<String, Vec<Row>>,
}

impl LookupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups rows by the value of `keycolumn`, preserving row order within
    /// each key. Rows with a missing or null key group under the empty
    /// string.
    pub fn from_rows<I>(rows: I, keycolumn: &str) -> Self
    where
        I: IntoIterator<Item = Row>,
    {
        let mut map: HashMap<String, Vec<Row>> = HashMap::new();
        for row in rows {
            let key = row.value(keycolumn).unwrap_or("").to_string();
            map.entry(key).or_default().push(row);
        }
        Self { map }
    }

    /// Reads a headered delimited file into rows and groups them by
    /// `keycolumn`. Empty cells load as null values.
    pub fn from_delimited_path(path: &Path, keycolumn: &str, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if !headers.iter().any(|h| h == keycolumn) {
            return Err(Error::KeyColumn {
                column: keycolumn.to_string(),
            });
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let cell = record.get(idx).unwrap_or("");
                    let value = if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    };
                    (name.clone(), value)
                })
                .collect();
            rows.push(row);
        }
        let row_count = rows.len();

        let index = Self::from_rows(rows, keycolumn);
        info!(
            "Lookup index built from {:?}: {} row(s) across {} key(s)",
            path,
            row_count,
            index.len()
        );
        Ok(index)
    }

    pub fn insert(&mut self, key: impl Into<String>, row: Row) {
        self.map.entry(key.into()).or_default().push(row);
    }

    /// Candidate rows for `key`; empty when the key is absent.
    pub fn get(&self, key: &str) -> &[Row] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}
