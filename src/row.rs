//! Ordered field-name -> value records flowing through a transform chain.
//!
//! A [`Row`] keeps its fields in insertion order and distinguishes a field
//! that is absent from one that is present with a null value; both read as
//! blank for matching purposes.

use serde::{Deserialize, Serialize};

/// Outcome of reading a single field off a [`Row`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRead<'a> {
    /// No field with that name exists.
    Missing,
    /// The field exists but holds an explicit null.
    Null,
    /// The field holds a string value (possibly empty).
    Text(&'a str),
}

impl<'a> FieldRead<'a> {
    pub fn is_blank(self) -> bool {
        match self {
            FieldRead::Missing | FieldRead::Null => true,
            FieldRead::Text(value) => value.is_empty(),
        }
    }

    pub fn text(self) -> Option<&'a str> {
        match self {
            FieldRead::Text(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from `(name, value)` pairs, handy in tests and fixtures.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut row = Self::new();
        for (name, value) in pairs {
            row.insert(name, Some(value.to_string()));
        }
        row
    }

    pub fn get(&self, field: &str) -> FieldRead<'_> {
        match self.fields.iter().find(|(name, _)| name == field) {
            None => FieldRead::Missing,
            Some((_, None)) => FieldRead::Null,
            Some((_, Some(value))) => FieldRead::Text(value),
        }
    }

    /// Returns the field's text value, or `None` when absent or null.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.get(field).text()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    /// Sets a field, overwriting in place when it already exists so the
    /// original position is kept.
    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn remove(&mut self, field: &str) -> Option<Option<String>> {
        let idx = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}
