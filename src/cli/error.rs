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

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

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
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) | ApplicationError::InvalidTaxonomy { .. } => {
                        crate::exitcode::DATAERR
                    }
                    ApplicationError::UnknownWidget(_) => crate::exitcode::USAGE,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { source, .. }
                        if source.downcast_ref::<std::io::Error>().is_some() =>
                    {
                        crate::exitcode::IOERR
                    }
                    ApplicationError::OperationFailed { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_layered_errors_when_exit_code_then_maps_to_sysexits() {
        let domain: CliError = ApplicationError::from(DomainError::EmptyPath).into();
        assert_eq!(domain.exit_code(), crate::exitcode::DATAERR);

        let widget: CliError = ApplicationError::UnknownWidget("aroma".into()).into();
        assert_eq!(widget.exit_code(), crate::exitcode::USAGE);

        let config: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);

        let io: CliError = InfraError::io(
            "write",
            std::io::Error::new(std::io::ErrorKind::Other, "disk"),
        )
        .into();
        assert_eq!(io.exit_code(), crate::exitcode::IOERR);

        let read: CliError = ApplicationError::OperationFailed {
            context: "read selection".into(),
            source: Box::new(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        }
        .into();
        assert_eq!(read.exit_code(), crate::exitcode::IOERR);
    }
}
