use modelfaker_core::{Record, Value};
use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::errors::ReplaceError;

pub mod lazy;
pub mod simple;

/// Context-free replacer: produces a value without looking at the record.
pub trait Replacer: Send {
    fn id(&self) -> &'static str;

    fn apply(&mut self, rng: &mut dyn RngCore) -> Result<Value, ReplaceError>;
}

/// Context-aware replacer: derives its value from fields of the record being
/// faked, which already hold this pass's replacement values.
pub trait LazyReplacer: Send {
    fn id(&self) -> &'static str;

    fn apply(&mut self, record: &Record, rng: &mut dyn RngCore) -> Result<Value, ReplaceError>;
}

/// Text of a record field, failing when the field is absent.
pub(crate) fn field_text(record: &Record, field: &str) -> Result<String, ReplaceError> {
    record
        .get(field)
        .map(|value| value.to_string())
        .ok_or_else(|| ReplaceError::MissingField(field.to_string()))
}

pub(crate) fn slug_field(record: &Record, field: &str) -> Result<String, ReplaceError> {
    field_text(record, field).map(|text| slug::slugify(text))
}

pub(crate) fn pick<'a>(pool: &'a [&'a str], rng: &mut dyn RngCore) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}
