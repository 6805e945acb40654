//! Ошибки загрузки конфигурации.
//!
//! Единственная fallible поверхность симуляции: gameplay пути ошибок не возвращают.

use std::path::PathBuf;

use thiserror::Error;

use crate::combat::AttackId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed combat config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("attack catalog is empty")]
    EmptyCatalog,

    #[error("attack catalog has no starter attacks")]
    NoStarters,

    #[error("attack `{0}` is defined more than once")]
    DuplicateAttack(AttackId),

    #[error("`{referenced_by}` references unknown attack `{id}`")]
    UnknownAttack { referenced_by: String, id: AttackId },

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: String, value: f32 },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, value: f32) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value,
        }
    }
}
