//! Error types for `credstore`
//!
//! Each concern has its own error enum; [`CredStoreError`] wraps them for
//! callers that want a single type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by secret values, the XML codec, and store backends
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// A secret violates a length or required-field constraint
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The XML document could not be parsed or written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Well-formed XML that does not describe a valid secret
    #[error("Malformed secret: {0}")]
    MalformedSecret(String),

    /// The native secret store cannot be reached
    #[error("Secret backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The native store rejected a put or delete
    #[error("Secret store operation failed: {0}")]
    StoreOperationFailed(String),
}

impl SecretError {
    /// Returns true for errors that describe bad secret data rather than a
    /// failing backend
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Serialization(_) | Self::MalformedSecret(_)
        )
    }
}

/// Result type for secret operations
pub type SecretResult<T> = Result<T, SecretError>;

/// Errors related to the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse the settings file
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A setting has an invalid value
    #[error("Invalid configuration value for {field}: {reason}")]
    Validation {
        /// The offending field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// No configuration directory could be determined
    #[error("Configuration directory not found: {0}")]
    NotFound(PathBuf),

    /// Failed to write the settings file
    #[error("Failed to write configuration: {0}")]
    Write(String),

    /// Failed to serialize settings
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// IO error while reading settings
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Crate-level error
#[derive(Debug, Error)]
pub enum CredStoreError {
    /// Secret or store error
    #[error(transparent)]
    Secret(#[from] SecretError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}
