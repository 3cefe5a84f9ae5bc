use std::collections::BTreeSet;

use modelfaker_core::{RecordId, StoreError};
use modelfaker_replace::ReplaceError;
use thiserror::Error;

use crate::declaration::DeclarationId;

/// Errors emitted by the faking engine.
#[derive(Debug, Error)]
pub enum FakerError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Unicity(#[from] UnicityError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("replacer error: {0}")]
    Replace(#[from] ReplaceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
}

/// A declaration, a manifest or the settings are malformed.
///
/// Always raised before the declaration concerned touches the store.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("faker '{0}' has no target model")]
    MissingTarget(DeclarationId),
    #[error("faker '{declaration}' has an invalid {filter} filter: {reason}")]
    InvalidFilter {
        declaration: DeclarationId,
        filter: &'static str,
        reason: String,
    },
    #[error("faker '{declaration}' binds field '{field}' more than once")]
    DuplicateField {
        declaration: DeclarationId,
        field: String,
    },
    #[error("faker '{0}' is declared more than once")]
    DuplicateDeclaration(DeclarationId),
    #[error("faker '{declaration}' depends on unknown faker '{dependency}'")]
    UnknownDependency {
        declaration: DeclarationId,
        dependency: DeclarationId,
    },
    #[error("dependency cycle between fakers: {}", join_ids(.0))]
    DependencyCycle(Vec<DeclarationId>),
    #[error("invalid faker id '{0}', expected '<app>.<Name>'")]
    InvalidDeclarationId(String),
    #[error("no fakers registered for app '{0}'")]
    UnknownApp(String),
    #[error("unknown faker '{0}'")]
    UnknownDeclaration(String),
    #[error("faker '{0}' given without its app")]
    DeclarationWithoutApp(String),
    #[error("invalid setting: {0}")]
    InvalidSetting(String),
    #[error("invalid manifest: {0}")]
    Manifest(String),
}

/// No attempt produced a record passing the uniqueness check.
#[derive(Debug, Error)]
#[error("can't find a unique value for field(s): {}", join_fields(.fields))]
pub struct UnicityError {
    pub declaration: DeclarationId,
    pub record: RecordId,
    pub fields: BTreeSet<String>,
}

fn join_fields(fields: &BTreeSet<String>) -> String {
    fields.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn join_ids(ids: &[DeclarationId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicity_message_lists_fields() {
        let err = UnicityError {
            declaration: DeclarationId::new("shop", "CustomerFaker"),
            record: 4,
            fields: ["email".to_string(), "username".to_string()].into(),
        };
        assert_eq!(
            err.to_string(),
            "can't find a unique value for field(s): email, username"
        );
    }
}
