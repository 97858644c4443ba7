//! Errors raised while interpreting stored values.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A stored value does not match any known variant of an enumeration
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

impl DomainError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        DomainError::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
