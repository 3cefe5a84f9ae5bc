use std::collections::BTreeSet;

use crate::error::Result;
use crate::record::Record;
use crate::selection::Selection;

/// Outcome of the logical pre-save uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uniqueness {
    Unique,
    /// Fields whose values collide with another record.
    Conflict(BTreeSet<String>),
}

impl Uniqueness {
    pub fn is_unique(&self) -> bool {
        matches!(self, Uniqueness::Unique)
    }
}

/// Persistence operations the faking engine relies on.
///
/// Every call is blocking; the engine never holds records across calls
/// other than the snapshot returned by `filter`.
pub trait DataStore {
    /// Records of `selection.model` matching the predicate, in primary key order.
    fn filter(&self, selection: &Selection) -> Result<Vec<Record>>;

    /// Removes the given records and returns how many were present.
    fn delete(&mut self, records: &[Record]) -> Result<usize>;

    fn save(&mut self, record: &Record) -> Result<()>;

    /// Checks `record` against the model's uniqueness rules without saving.
    fn validate_uniqueness(&self, record: &Record) -> Result<Uniqueness>;
}
