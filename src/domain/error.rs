//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of catalog and course rules.
/// These are independent of file access and presentation concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("malformed record on line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("invalid {field}: {message}")]
    InvalidAttribute {
        field: &'static str,
        message: String,
    },

    #[error("courses are not the same offering: {left} vs {right}")]
    NotSameOffering { left: String, right: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
