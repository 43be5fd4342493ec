//! Candidate merge-row selection: exclude criteria narrow first, then the
//! optional first-position filter truncates, then include criteria filter
//! what is left.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{criteria::Criterion, error::Result, row::Row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    First,
}

/// Include/exclude criteria plus an optional position filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub exclude: Vec<Criterion>,
    pub include: Vec<Criterion>,
    pub position: Option<Position>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude(mut self, criterion: Criterion) -> Self {
        self.exclude.push(criterion);
        self
    }

    pub fn include(mut self, criterion: Criterion) -> Self {
        self.include.push(criterion);
        self
    }

    /// Keep only the first candidate surviving exclusion.
    pub fn first_only(mut self) -> Self {
        self.position = Some(Position::First);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.exclude.is_empty() && self.include.is_empty() && self.position.is_none()
    }
}

/// Applies [`Conditions`] to a candidate row list for one source row.
#[derive(Debug, Clone)]
pub struct RowSelector {
    conditions: Conditions,
    delim: Option<String>,
}

impl RowSelector {
    /// `delim` is only consulted by multivalue checks inside the conditions.
    pub fn new(conditions: Conditions, delim: Option<String>) -> Self {
        RowSelector { conditions, delim }
    }

    /// Returns the selected subset of `mergerows`, possibly empty. When
    /// `mergerows` is empty the source row itself is the working set, so
    /// exclude/include rules still apply with nothing to merge.
    pub fn select(&self, origrow: &Row, mergerows: &[Row]) -> Result<Vec<Row>> {
        let working: Vec<Row> = if mergerows.is_empty() {
            vec![origrow.clone()]
        } else {
            mergerows.to_vec()
        };
        let candidate_count = working.len();
        let delim = self.delim.as_deref();

        // A candidate matching ANY exclude criterion is rejected.
        let mut survivors = Vec::with_capacity(working.len());
        'candidates: for candidate in working {
            for criterion in &self.conditions.exclude {
                if criterion.check(origrow, Some(&candidate), delim)? {
                    continue 'candidates;
                }
            }
            survivors.push(candidate);
        }

        if self.conditions.position == Some(Position::First) {
            survivors.truncate(1);
        }

        // A candidate must pass ALL include criteria to be kept.
        let mut selected = Vec::with_capacity(survivors.len());
        'survivors: for candidate in survivors {
            for criterion in &self.conditions.include {
                if !criterion.check(origrow, Some(&candidate), delim)? {
                    continue 'survivors;
                }
            }
            selected.push(candidate);
        }

        debug!(
            "Selected {} of {} candidate row(s)",
            selected.len(),
            candidate_count
        );
        Ok(selected)
    }
}
