//! Nested boolean condition configuration: a [`Criterion`] holds one or more
//! [`CheckSet`]s, a set holds individual [`Check`]s, and each level reduces
//! its children with an Any/All combinator.

use serde::{Deserialize, Serialize};

use crate::{
    compare::{Comparand, FieldRef, field_empty, pair_equality, pair_inclusion},
    error::Result,
    row::Row,
};

/// How a level combines its children's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Combinator {
    /// Logical OR: at least one child must pass. False over no children.
    Any,
    /// Logical AND: no child may fail. True over no children.
    All,
}

/// A single comparator check evaluated against a row/mergerow pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Check {
    Equal { left: Comparand, right: Comparand },
    Include { left: Comparand, right: Comparand },
    Empty { field: FieldRef },
}

impl Check {
    pub fn equal(left: Comparand, right: Comparand) -> Self {
        Check::Equal { left, right }
    }

    pub fn include(left: Comparand, right: Comparand) -> Self {
        Check::Include { left, right }
    }

    pub fn empty(field: FieldRef) -> Self {
        Check::Empty { field }
    }

    pub fn check(&self, row: &Row, mergerow: Option<&Row>, delim: Option<&str>) -> Result<bool> {
        match self {
            Check::Equal { left, right } => pair_equality(left, right, row, mergerow, delim),
            Check::Include { left, right } => pair_inclusion(left, right, row, mergerow, delim),
            Check::Empty { field } => Ok(field_empty(field, row, mergerow)),
        }
    }
}

/// One named set of checks. Defaults to `Any` semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSet {
    pub combinator: Combinator,
    pub checks: Vec<Check>,
}

impl CheckSet {
    pub fn any(checks: Vec<Check>) -> Self {
        CheckSet {
            combinator: Combinator::Any,
            checks,
        }
    }

    pub fn all(checks: Vec<Check>) -> Self {
        CheckSet {
            combinator: Combinator::All,
            checks,
        }
    }

    pub fn check(&self, row: &Row, mergerow: Option<&Row>, delim: Option<&str>) -> Result<bool> {
        reduce(self.combinator, &self.checks, |check| {
            check.check(row, mergerow, delim)
        })
    }
}

/// A full criterion: multiple check sets reduced at a higher level.
/// Defaults to `All` semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub combinator: Combinator,
    pub sets: Vec<CheckSet>,
}

impl Criterion {
    pub fn any(sets: Vec<CheckSet>) -> Self {
        Criterion {
            combinator: Combinator::Any,
            sets,
        }
    }

    pub fn all(sets: Vec<CheckSet>) -> Self {
        Criterion {
            combinator: Combinator::All,
            sets,
        }
    }

    /// Wraps a single check in the default nesting: an `All` criterion over
    /// one `Any` set.
    pub fn of(check: Check) -> Self {
        Criterion::all(vec![CheckSet::any(vec![check])])
    }

    pub fn check(&self, row: &Row, mergerow: Option<&Row>, delim: Option<&str>) -> Result<bool> {
        reduce(self.combinator, &self.sets, |set| {
            set.check(row, mergerow, delim)
        })
    }
}

fn reduce<T>(
    combinator: Combinator,
    items: &[T],
    mut eval: impl FnMut(&T) -> Result<bool>,
) -> Result<bool> {
    match combinator {
        Combinator::Any => {
            for item in items {
                if eval(item)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Combinator::All => {
            for item in items {
                if !eval(item)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}
