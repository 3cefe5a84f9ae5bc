use std::collections::BTreeSet;

use thiserror::Error;

use crate::record::RecordId;

/// Errors raised by a data store while filtering, deleting or saving records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store has no table for the requested model.
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    /// The record was removed or never existed.
    #[error("record {model}#{id} not found")]
    NotFound { model: String, id: RecordId },
    /// Physical constraint enforcement rejected a save.
    #[error("constraint violation on {model}#{id}: {}", join_fields(.fields))]
    ConstraintViolation {
        model: String,
        id: RecordId,
        fields: BTreeSet<String>,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

fn join_fields(fields: &BTreeSet<String>) -> String {
    fields.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
