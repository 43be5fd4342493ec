use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::row::Row;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortMode {
    Text,
    Numeric,
}

/// Where blank values land, regardless of sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlankPlacement {
    First,
    Last,
}

/// Stable pre-sort of candidate merge rows on one field before they reach
/// the fieldset. Numeric mode parses integers; unparseable values are
/// treated as blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowSorter {
    field: String,
    mode: SortMode,
    direction: SortDirection,
    blanks: BlankPlacement,
}

impl RowSorter {
    pub fn new(
        field: impl Into<String>,
        mode: SortMode,
        direction: SortDirection,
        blanks: BlankPlacement,
    ) -> Self {
        RowSorter {
            field: field.into(),
            mode,
            direction,
            blanks,
        }
    }

    pub fn sort(&self, rows: &mut [Row]) {
        match self.mode {
            SortMode::Text => {
                rows.sort_by(|a, b| self.ordered(self.text_key(a), self.text_key(b)));
            }
            SortMode::Numeric => {
                rows.sort_by(|a, b| self.ordered(self.numeric_key(a), self.numeric_key(b)));
            }
        }
    }

    fn text_key<'a>(&self, row: &'a Row) -> Option<&'a str> {
        row.value(&self.field).filter(|value| !value.is_empty())
    }

    fn numeric_key(&self, row: &Row) -> Option<i64> {
        self.text_key(row).and_then(|value| value.trim().parse().ok())
    }

    fn ordered<T: Ord>(&self, a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => match self.blanks {
                BlankPlacement::First => Ordering::Less,
                BlankPlacement::Last => Ordering::Greater,
            },
            (Some(_), None) => match self.blanks {
                BlankPlacement::First => Ordering::Greater,
                BlankPlacement::Last => Ordering::Less,
            },
            (Some(a), Some(b)) => {
                let ordering = a.cmp(&b);
                if self.direction.is_ascending() {
                    ordering
                } else {
                    ordering.reverse()
                }
            }
        }
    }
}
