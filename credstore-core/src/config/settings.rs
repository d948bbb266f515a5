//! Settings model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::provider::SecureOption;
use crate::store::NativeKey;
use crate::tracing::{TracingConfig, TracingLevel, TracingOutput};

/// Directory name used under the platform config and data directories
pub const APP_DIR_NAME: &str = "credstore";

/// File name of the insecure fallback store
pub const FALLBACK_FILE_NAME: &str = "insecure-store.json";

fn default_namespace() -> String {
    APP_DIR_NAME.to_string()
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Prefix of every native key; must not contain `:`
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Security level used when the caller does not ask for one
    pub secure_option: SecureOption,
    /// Location of the insecure fallback file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_path: Option<PathBuf>,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            secure_option: SecureOption::default(),
            fallback_path: None,
            logging: LoggingSettings::default(),
        }
    }
}

impl StorageSettings {
    /// Checks every field
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.namespace.trim().is_empty() {
            return Err(invalid("namespace", "must not be empty"));
        }
        if self.namespace.contains(NativeKey::SEPARATOR) {
            return Err(invalid(
                "namespace",
                &format!("must not contain '{}'", NativeKey::SEPARATOR),
            ));
        }
        if let Some(path) = &self.fallback_path
            && path.as_os_str().is_empty()
        {
            return Err(invalid("fallback_path", "must not be empty"));
        }
        self.logging.validate()
    }

    /// Fallback file location, resolving the platform default
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no path is configured and the
    /// platform has no local data directory.
    pub fn resolved_fallback_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.fallback_path {
            return Ok(path.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(FALLBACK_FILE_NAME))
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from(FALLBACK_FILE_NAME)))
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level for `credstore` targets
    pub level: TracingLevel,
    /// Raw `EnvFilter` directives, overriding `level`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Log file to append to instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl LoggingSettings {
    /// Checks the filter directives
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the filter does not parse.
    pub fn validate(&self) -> ConfigResult<()> {
        self.to_tracing_config()
            .env_filter()
            .map(|_| ())
            .map_err(|e| invalid("logging.filter", &e.to_string()))
    }

    /// Tracing configuration these settings describe
    #[must_use]
    pub fn to_tracing_config(&self) -> TracingConfig {
        let mut config = TracingConfig::new().with_level(self.level);
        if let Some(path) = &self.file {
            config = config.with_output(TracingOutput::File(path.clone()));
        }
        match &self.filter {
            Some(filter) => config.with_filter(filter.clone()),
            None => config,
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
