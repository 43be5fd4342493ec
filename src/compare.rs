//! Single declarative comparisons between two values drawn from the current
//! row, a candidate merge row, a literal, or a regex pattern.
//!
//! Multivalue comparand variants expand a delimited field into its parts and
//! succeed when any combination of parts matches. Missing fields never fail
//! a comparison; they degrade to sentinel values that cannot match real
//! data.

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    row::{FieldRead, Row},
};

/// Stands in for a field that does not exist on the row being compared.
const FIELD_ABSENT: &str = "%field does not exist%";
/// Stands in for an empty entry inside a multivalue field.
const COMPARE_NOTHING: &str = "%comparenothing%";

/// One side of a comparison pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparand {
    /// A field read off the current row.
    RowField(String),
    /// A field read off the candidate merge row.
    MergeRowField(String),
    /// A literal string.
    Literal(String),
    /// A regex pattern; anchored as `^pattern$` for equality checks,
    /// unanchored for inclusion checks.
    Pattern(String),
    /// A delimited multivalue field on the current row.
    MultiRowField(String),
    /// A delimited multivalue field on the candidate merge row.
    MultiMergeRowField(String),
}

impl Comparand {
    fn is_multi(&self) -> bool {
        matches!(
            self,
            Comparand::MultiRowField(_) | Comparand::MultiMergeRowField(_)
        )
    }
}

/// A row-scoped or mergerow-scoped field reference for emptiness checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldRef {
    Row(String),
    MergeRow(String),
}

/// True iff the referenced field is absent, null, or empty.
pub fn field_empty(field: &FieldRef, row: &Row, mergerow: Option<&Row>) -> bool {
    match field {
        FieldRef::Row(name) => row.get(name).is_blank(),
        FieldRef::MergeRow(name) => mergerow.is_none_or(|merge| merge.get(name).is_blank()),
    }
}

enum Resolved {
    Text(String),
    Pattern(String),
}

pub fn pair_equality(
    left: &Comparand,
    right: &Comparand,
    row: &Row,
    mergerow: Option<&Row>,
    delim: Option<&str>,
) -> Result<bool> {
    if left.is_multi() || right.is_multi() {
        let delim = require_delim(delim)?;
        for (part_left, part_right) in expanded_pairs(left, right, row, mergerow, delim) {
            if pair_equality(&part_left, &part_right, row, mergerow, None)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    let resolved_left = resolve_equality(left, row, mergerow);
    let resolved_right = resolve_equality(right, row, mergerow);
    match (resolved_left, resolved_right) {
        (Resolved::Text(a), Resolved::Text(b)) => Ok(a == b),
        (Resolved::Text(text), Resolved::Pattern(pattern))
        | (Resolved::Pattern(pattern), Resolved::Text(text)) => {
            Ok(anchored(&pattern)?.is_match(&text))
        }
        (Resolved::Pattern(a), Resolved::Pattern(b)) => Ok(a == b),
    }
}

pub fn pair_inclusion(
    left: &Comparand,
    right: &Comparand,
    row: &Row,
    mergerow: Option<&Row>,
    delim: Option<&str>,
) -> Result<bool> {
    if left.is_multi() || right.is_multi() {
        let delim = require_delim(delim)?;
        for (part_left, part_right) in expanded_pairs(left, right, row, mergerow, delim) {
            if pair_inclusion(&part_left, &part_right, row, mergerow, None)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    let Some(container) = resolve_inclusion(left, row, mergerow) else {
        return Ok(false);
    };
    let Some(needle) = resolve_inclusion(right, row, mergerow) else {
        return Ok(false);
    };
    match (container, needle) {
        (Resolved::Text(container), Resolved::Text(needle)) => Ok(container.contains(&needle)),
        (Resolved::Text(container), Resolved::Pattern(pattern)) => {
            Ok(unanchored(&pattern)?.is_match(&container))
        }
        (Resolved::Pattern(container), Resolved::Text(needle)) => Ok(container.contains(&needle)),
        (Resolved::Pattern(container), Resolved::Pattern(pattern)) => {
            Ok(unanchored(&pattern)?.is_match(&container))
        }
    }
}

fn resolve_equality(side: &Comparand, row: &Row, mergerow: Option<&Row>) -> Resolved {
    match side {
        Comparand::RowField(field) => Resolved::Text(equality_text(row.get(field))),
        Comparand::MergeRowField(field) => match mergerow {
            Some(merge) => Resolved::Text(equality_text(merge.get(field))),
            None => Resolved::Text(FIELD_ABSENT.to_string()),
        },
        Comparand::Literal(value) => Resolved::Text(value.clone()),
        Comparand::Pattern(pattern) => Resolved::Pattern(pattern.clone()),
        Comparand::MultiRowField(_) | Comparand::MultiMergeRowField(_) => {
            unreachable!("multivalue comparands are expanded before resolution")
        }
    }
}

fn equality_text(read: FieldRead<'_>) -> String {
    match read {
        FieldRead::Missing => FIELD_ABSENT.to_string(),
        FieldRead::Null => String::new(),
        FieldRead::Text(value) => value.to_string(),
    }
}

fn resolve_inclusion(side: &Comparand, row: &Row, mergerow: Option<&Row>) -> Option<Resolved> {
    match side {
        Comparand::RowField(field) => inclusion_text(row.get(field)),
        Comparand::MergeRowField(field) => inclusion_text(mergerow?.get(field)),
        Comparand::Literal(value) => Some(Resolved::Text(value.clone())),
        Comparand::Pattern(pattern) => Some(Resolved::Pattern(pattern.clone())),
        Comparand::MultiRowField(_) | Comparand::MultiMergeRowField(_) => {
            unreachable!("multivalue comparands are expanded before resolution")
        }
    }
}

fn inclusion_text(read: FieldRead<'_>) -> Option<Resolved> {
    match read {
        FieldRead::Missing | FieldRead::Null => None,
        FieldRead::Text(value) => Some(Resolved::Text(value.to_string())),
    }
}

fn require_delim(delim: Option<&str>) -> Result<&str> {
    delim.ok_or_else(|| Error::Merge("multivalue comparison requires a delimiter".to_string()))
}

/// Cartesian product of the expanded sides, each expanded part carried as a
/// literal. A multivalue side whose field is blank expands to nothing, so
/// the product is empty and the check fails.
fn expanded_pairs(
    left: &Comparand,
    right: &Comparand,
    row: &Row,
    mergerow: Option<&Row>,
    delim: &str,
) -> Vec<(Comparand, Comparand)> {
    let lefts = expand_side(left, row, mergerow, delim);
    let rights = expand_side(right, row, mergerow, delim);
    lefts.into_iter().cartesian_product(rights).collect()
}

fn expand_side(side: &Comparand, row: &Row, mergerow: Option<&Row>, delim: &str) -> Vec<Comparand> {
    match side {
        Comparand::MultiRowField(field) => split_field(row.get(field), delim),
        Comparand::MultiMergeRowField(field) => match mergerow {
            Some(merge) => split_field(merge.get(field), delim),
            None => Vec::new(),
        },
        other => vec![other.clone()],
    }
}

/// Interior empty entries become the compare-nothing sentinel so they cannot
/// match real data; trailing empty entries are dropped.
fn split_field(read: FieldRead<'_>, delim: &str) -> Vec<Comparand> {
    let Some(text) = read.text() else {
        return Vec::new();
    };
    let mut parts: Vec<&str> = text.split(delim).collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts
        .into_iter()
        .map(|part| {
            Comparand::Literal(if part.is_empty() {
                COMPARE_NOTHING.to_string()
            } else {
                part.to_string()
            })
        })
        .collect()
}

fn anchored(pattern: &str) -> Result<Regex> {
    compile(&format!("^{pattern}$"), pattern)
}

fn unanchored(pattern: &str) -> Result<Regex> {
    compile(pattern, pattern)
}

fn compile(expression: &str, original: &str) -> Result<Regex> {
    Regex::new(expression).map_err(|source| Error::Pattern {
        pattern: original.to_string(),
        source,
    })
}
