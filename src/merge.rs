//! The `MultiRowLookup` transform: pulls candidate rows out of a
//! [`LookupIndex`] by key, filters them through a [`RowSelector`], sorts
//! them if configured, accumulates their values through a [`Fieldset`], and
//! writes the joined results back into the row.

use log::debug;

use crate::{
    error::{Error, Result},
    fieldset::Fieldset,
    lookup::LookupIndex,
    row::Row,
    selector::{Conditions, RowSelector},
    sorter::RowSorter,
    transform::Transform,
};

#[derive(Debug, Clone)]
pub struct MultiRowLookup {
    lookup: LookupIndex,
    keycolumn: String,
    fieldmap: Vec<(String, String)>,
    constantmap: Vec<(String, String)>,
    selector: Option<RowSelector>,
    sorter: Option<RowSorter>,
    multikey: bool,
    delim: String,
    null_placeholder: Option<String>,
}

impl MultiRowLookup {
    pub fn builder(
        lookup: LookupIndex,
        keycolumn: impl Into<String>,
    ) -> MultiRowLookupBuilder {
        MultiRowLookupBuilder {
            lookup,
            keycolumn: keycolumn.into(),
            fieldmap: Vec::new(),
            constantmap: Vec::new(),
            conditions: None,
            sorter: None,
            multikey: false,
            delim: None,
            null_placeholder: None,
        }
    }

    /// Merges lookup results into `row` in place: key extraction, candidate
    /// fetch, selection, optional sort, fieldset accumulation, constants,
    /// join, write-back.
    pub fn process(&self, row: &mut Row) -> Result<()> {
        let keyval = row.value(&self.keycolumn).unwrap_or("").to_string();
        let keys: Vec<String> = if self.multikey {
            if keyval.is_empty() {
                Vec::new()
            } else {
                keyval.split(self.delim.as_str()).map(str::to_string).collect()
            }
        } else {
            vec![keyval]
        };

        let mut fieldset = Fieldset::new(
            self.fieldmap.iter().map(|(_, source)| source.clone()),
            self.null_placeholder.clone(),
        );

        for key in &keys {
            let candidates = self.lookup.get(key);
            let selected: Vec<Row> = if candidates.is_empty() {
                Vec::new()
            } else {
                let mut picked = match &self.selector {
                    Some(selector) => selector.select(row, candidates)?,
                    None => candidates.to_vec(),
                };
                if let Some(sorter) = &self.sorter {
                    sorter.sort(&mut picked);
                }
                picked
            };
            debug!(
                "Merge key '{}': {} candidate(s), {} selected",
                key,
                candidates.len(),
                selected.len()
            );
            fieldset.populate(&selected);
        }

        for (target, value) in &self.constantmap {
            fieldset.add_constant(target.clone(), value);
        }

        for (field, joined) in fieldset.join_values(&self.delim) {
            let target = self
                .fieldmap
                .iter()
                .find(|(_, source)| *source == field)
                .map(|(target, _)| target.as_str())
                .unwrap_or(field.as_str());
            row.insert(target, joined);
        }
        Ok(())
    }
}

impl Transform for MultiRowLookup {
    fn process(&self, mut row: Row) -> Result<Option<Row>> {
        MultiRowLookup::process(self, &mut row)?;
        Ok(Some(row))
    }
}

/// Builder for [`MultiRowLookup`]. `build()` fails fast on configurations
/// that cannot support key fetching or write-back, before any row is
/// processed.
#[derive(Debug, Clone)]
pub struct MultiRowLookupBuilder {
    lookup: LookupIndex,
    keycolumn: String,
    fieldmap: Vec<(String, String)>,
    constantmap: Vec<(String, String)>,
    conditions: Option<Conditions>,
    sorter: Option<RowSorter>,
    multikey: bool,
    delim: Option<String>,
    null_placeholder: Option<String>,
}

impl MultiRowLookupBuilder {
    /// Maps a target field written into the row to the source field read
    /// off each merge row.
    pub fn field(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.fieldmap.push((target.into(), source.into()));
        self
    }

    /// Adds a constant value merged once per matched merge row.
    pub fn constant(mut self, target: impl Into<String>, value: impl Into<String>) -> Self {
        self.constantmap.push((target.into(), value.into()));
        self
    }

    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn sorter(mut self, sorter: RowSorter) -> Self {
        self.sorter = Some(sorter);
        self
    }

    /// Treat the key column as a delimited multivalue field and run one
    /// lookup per key.
    pub fn multikey(mut self) -> Self {
        self.multikey = true;
        self
    }

    pub fn delim(mut self, delim: impl Into<String>) -> Self {
        self.delim = Some(delim.into());
        self
    }

    pub fn null_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.null_placeholder = Some(placeholder.into());
        self
    }

    pub fn build(self) -> Result<MultiRowLookup> {
        if self.keycolumn.is_empty() {
            return Err(Error::Merge("a key column is required".to_string()));
        }
        if self.fieldmap.is_empty() {
            return Err(Error::Merge(
                "at least one fieldmap entry is required".to_string(),
            ));
        }
        for (idx, (_, source)) in self.fieldmap.iter().enumerate() {
            if self.fieldmap[..idx].iter().any(|(_, seen)| seen == source) {
                return Err(Error::Merge(format!(
                    "fieldmap source field '{source}' is mapped more than once"
                )));
            }
        }
        let delim = match self.delim {
            Some(delim) if !delim.is_empty() => delim,
            Some(_) => return Err(Error::Merge("the delimiter cannot be empty".to_string())),
            None => return Err(Error::Merge("a delimiter is required".to_string())),
        };

        let selector = self
            .conditions
            .filter(|conditions| !conditions.is_empty())
            .map(|conditions| RowSelector::new(conditions, Some(delim.clone())));

        Ok(MultiRowLookup {
            lookup: self.lookup,
            keycolumn: self.keycolumn,
            fieldmap: self.fieldmap,
            constantmap: self.constantmap,
            selector,
            sorter: self.sorter,
            multikey: self.multikey,
            delim,
            null_placeholder: self.null_placeholder,
        })
    }
}
