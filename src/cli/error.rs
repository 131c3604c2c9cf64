//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(DomainError::CycleDetected { .. }) => {
                    crate::exitcode::DATAERR
                }
                ApplicationError::Parse { .. }
                | ApplicationError::InvalidRecord { .. }
                | ApplicationError::DuplicateCode { .. } => crate::exitcode::DATAERR,
                ApplicationError::NotFound(_) => crate::exitcode::NOINPUT,
                ApplicationError::Read { .. } => crate::exitcode::IOERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_cycle_error_when_mapping_then_data_error_exit() {
        let err = CliError::from(ApplicationError::from(DomainError::CycleDetected {
            code: "A".to_string(),
        }));

        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_usage_error_when_mapping_then_usage_exit() {
        let err = CliError::Usage("no command given".to_string());

        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_missing_file_when_mapping_then_no_input_exit() {
        let err = CliError::from(ApplicationError::NotFound(PathBuf::from("x.toml")));

        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }
}
