use thiserror::Error;

/// Errors emitted while producing a replacement value.
#[derive(Debug, Error)]
pub enum ReplaceError {
    #[error("choice pool is empty")]
    EmptyChoices,
    /// A without-replacement pool was asked for more values than it held.
    #[error("choice pool exhausted after {picked} picks")]
    Exhausted { picked: usize },
    #[error("record has no field '{0}'")]
    MissingField(String),
    #[error("field '{0}' is empty")]
    EmptyField(String),
    #[error("template error: {0}")]
    Template(String),
    #[error("unsupported fake generator '{0}'")]
    UnknownGenerator(String),
    #[error("invalid replacer: {0}")]
    Invalid(String),
}
