//! Shared utility functions used across command modules.

use std::path::Path;

use credstore_core::{ConfigManager, SecureOption, StorageProvider, StorageSettings};
use secrecy::SecretString;

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads the settings from the configured directory
pub fn load_settings(config_path: Option<&Path>) -> Result<StorageSettings, CliError> {
    create_config_manager(config_path)?
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))
}

/// Builds a provider from settings, applying the command-line level
pub fn create_provider(
    settings: &StorageSettings,
    secure: Option<SecureOption>,
) -> Result<StorageProvider, CliError> {
    let provider = StorageProvider::from_settings(settings)?;
    Ok(match secure {
        Some(option) => provider.with_default_option(option),
        None => provider,
    })
}

/// Returns the given value or prompts for it without echo
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<SecretString, CliError> {
    let value = match value {
        Some(value) => value,
        None => rpassword::prompt_password(format!("{label}: "))?,
    };
    if value.is_empty() {
        return Err(CliError::Input(format!("{label} must not be empty")));
    }
    Ok(SecretString::from(value))
}

/// Masks a secret for display
#[must_use]
pub fn mask(value: &str, show: bool) -> String {
    if show {
        value.to_string()
    } else {
        "********".to_string()
    }
}
