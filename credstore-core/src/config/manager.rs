//! Settings file loading and saving

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::trace_operation_debug;
use crate::tracing::span_names;

use super::settings::{APP_DIR_NAME, StorageSettings};

/// Name of the settings file inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Reads and writes [`StorageSettings`] in a config directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the platform config directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the platform has no config
    /// directory.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound(PathBuf::from(APP_DIR_NAME)))?;
        Ok(Self::with_config_dir(base.join(APP_DIR_NAME)))
    }

    /// Creates a manager for a specific directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The config directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads and validates the settings, defaults if the file is missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// holds invalid values.
    pub fn load_settings(&self) -> ConfigResult<StorageSettings> {
        let path = self.settings_path();
        let _span = trace_operation_debug!(span_names::CONFIG_LOAD, path = %path.display())
            .entered();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(StorageSettings::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let settings: StorageSettings = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates and writes the settings, creating the directory
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the file cannot be
    /// written.
    pub fn save_settings(&self, settings: &StorageSettings) -> ConfigResult<()> {
        let path = self.settings_path();
        let _span = trace_operation_debug!(span_names::CONFIG_SAVE, path = %path.display())
            .entered();

        settings.validate()?;
        let content =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::create_dir_all(&self.config_dir)
            .map_err(|e| ConfigError::Write(format!("{}: {e}", self.config_dir.display())))?;
        fs::write(&path, content)
            .map_err(|e| ConfigError::Write(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "Settings saved");
        Ok(())
    }
}
