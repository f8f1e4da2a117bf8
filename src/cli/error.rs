//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) | ApplicationError::InvalidCatalog { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::CatalogNotFound(_) => crate::exitcode::NOINPUT,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_missing_catalog_then_noinput() {
        let err = CliError::from(ApplicationError::CatalogNotFound(PathBuf::from("x.txt")));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_malformed_catalog_then_dataerr() {
        let err = CliError::from(ApplicationError::InvalidCatalog {
            path: PathBuf::from("x.txt"),
            source: DomainError::MalformedRecord {
                line: 3,
                message: "expected 6 fields".into(),
            },
        });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_usage_error_then_usage() {
        assert_eq!(
            CliError::Usage("no command".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
