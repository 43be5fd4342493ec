//! Positional accumulation of values per declared field across a sequence
//! of selected merge rows.
//!
//! Every declared field receives exactly one entry per populated row, so
//! value N of one field lines up with value N of every other field when the
//! lists are later joined into delimited strings.

use crate::row::Row;

#[derive(Debug, Clone, Default)]
pub struct Fieldset {
    entries: Vec<(String, Vec<Option<String>>)>,
    null_placeholder: Option<String>,
}

impl Fieldset {
    pub fn new<I, S>(fields: I, null_placeholder: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Fieldset {
            entries: fields
                .into_iter()
                .map(|field| (field.into(), Vec::new()))
                .collect(),
            null_placeholder,
        }
    }

    /// Appends each row's value for every declared field, in row order.
    /// Fields the row lacks contribute a null entry rather than nothing, so
    /// all lists stay the same length. An empty `rows` slice leaves the
    /// declared fields in place with unchanged lists.
    pub fn populate(&mut self, rows: &[Row]) {
        for (field, values) in &mut self.entries {
            for row in rows {
                values.push(row.get(field).text().map(str::to_string));
            }
        }
    }

    /// Adds a new tracked field filled with `value`, length-matched to the
    /// already-collected lists. When every existing list is empty the new
    /// field stays empty too: a constant must never imply rows matched when
    /// none did.
    pub fn add_constant(&mut self, field: impl Into<String>, value: &str) {
        let len = self
            .entries
            .iter()
            .map(|(_, values)| values.len())
            .max()
            .unwrap_or(0);
        self.entries
            .push((field.into(), vec![Some(value.to_string()); len]));
    }

    /// Joins every tracked field's list into a single delimited string, in
    /// insertion order. Null entries join as the configured placeholder, or
    /// as empty strings without one. A joined result that is entirely empty
    /// yields `None`. Non-mutating; repeated calls return identical output.
    pub fn join_values(&self, delim: &str) -> Vec<(String, Option<String>)> {
        self.entries
            .iter()
            .map(|(field, values)| {
                let joined = values
                    .iter()
                    .map(|value| match value {
                        Some(text) => text.as_str(),
                        None => self.null_placeholder.as_deref().unwrap_or(""),
                    })
                    .collect::<Vec<_>>()
                    .join(delim);
                let joined = if joined.is_empty() {
                    None
                } else {
                    Some(joined)
                };
                (field.clone(), joined)
            })
            .collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(field, _)| field.as_str())
    }

    pub fn values(&self, field: &str) -> Option<&[Option<String>]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    /// Lengths of every tracked list; the alignment invariant holds when
    /// these are all equal.
    pub fn lengths(&self) -> Vec<usize> {
        self.entries
            .iter()
            .map(|(_, values)| values.len())
            .collect()
    }
}
