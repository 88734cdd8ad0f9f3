use thiserror::Error;

use crate::domain::EntityKind;

/// Required form fields left blank on commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} required", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

impl ValidationError {
    pub fn is_missing(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("no editor is open")]
    NotEditing,
    #[error("the open editor expects a {expected} form")]
    FormMismatch { expected: EntityKind },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML header: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("failed to encode TOML header: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("failed to parse day record on line {line}: {source}")]
    JsonDecode {
        line: usize,
        source: serde_json::Error,
    },
    #[error("invalid day record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
    #[error("failed to encode day record: {0}")]
    JsonEncode(serde_json::Error),
    #[error("{kind} not found: {id}")]
    MissingEntity { kind: EntityKind, id: String },
    #[error("{kind} already exists: {id}")]
    DuplicateEntity { kind: EntityKind, id: String },
}
