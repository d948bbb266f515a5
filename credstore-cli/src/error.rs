//! CLI error types and exit codes.

use credstore_core::{ConfigError, SecretError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or store failures
    pub const GENERAL_ERROR: i32 = 1;
    /// Nothing is stored under the requested key
    pub const NOT_FOUND: i32 = 2;
    /// A secure store was required but none is reachable
    pub const BACKEND_UNAVAILABLE: i32 = 3;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secret or store error
    #[error("Secret error: {0}")]
    Secret(String),

    /// No secret under the requested key
    #[error("No {kind} stored under '{key}'")]
    NotFound {
        /// Kind of secret requested
        kind: String,
        /// Logical key
        key: String,
    },

    /// No secure store available
    #[error("Secret store unavailable: {0}")]
    Unavailable(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    Input(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SecretError> for CliError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::BackendUnavailable(msg) => Self::Unavailable(msg),
            SecretError::Validation(msg) => Self::Input(msg),
            other => Self::Secret(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, input, store, IO)
    /// - 2: Secret not found
    /// - 3: Secure store unavailable
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_codes::NOT_FOUND,
            Self::Unavailable(_) => exit_codes::BACKEND_UNAVAILABLE,
            Self::Config(_) | Self::Secret(_) | Self::Input(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let not_found = CliError::NotFound {
            kind: "Credential".into(),
            key: "svc".into(),
        };
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(not_found.to_string(), "No Credential stored under 'svc'");
        assert_eq!(
            CliError::Config("x".into()).exit_code(),
            exit_codes::GENERAL_ERROR
        );
    }

    #[test]
    fn test_from_secret_error() {
        let err: CliError = SecretError::BackendUnavailable("no dbus".into()).into();
        assert_eq!(err.exit_code(), exit_codes::BACKEND_UNAVAILABLE);

        let err: CliError = SecretError::Validation("blank".into()).into();
        assert!(matches!(err, CliError::Input(_)));

        let err: CliError = SecretError::StoreOperationFailed("denied".into()).into();
        assert!(matches!(err, CliError::Secret(_)));
    }
}
