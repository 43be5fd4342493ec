//! Lookup-merge building blocks for tabular data-migration pipelines.
//!
//! Rows are ordered field-name -> value records. A precomputed
//! [`LookupIndex`] maps key strings to candidate rows; [`MultiRowLookup`]
//! pulls candidates for each row, filters them through declarative
//! include/exclude criteria, and joins the matched values into delimited
//! fields with positional alignment across fields. The pieces compose: the
//! selection engine and the [`Fieldset`] accumulator are usable on their
//! own, and any row-level step can plug into a chain via [`Transform`].

pub mod compare;
pub mod criteria;
pub mod error;
pub mod fieldset;
pub mod lookup;
pub mod merge;
pub mod row;
pub mod selector;
pub mod sorter;
pub mod transform;

pub use compare::{Comparand, FieldRef};
pub use criteria::{Check, CheckSet, Combinator, Criterion};
pub use error::{Error, Result};
pub use fieldset::Fieldset;
pub use lookup::LookupIndex;
pub use merge::{MultiRowLookup, MultiRowLookupBuilder};
pub use row::{FieldRead, Row};
pub use selector::{Conditions, Position, RowSelector};
pub use sorter::{BlankPlacement, RowSorter, SortDirection, SortMode};
pub use transform::{Transform, apply_chain};
