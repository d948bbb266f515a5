//! Backend status command.

use std::path::Path;

use credstore_core::{KeyringDetector, NativeStoreDetector, SecureOption};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{create_provider, load_settings};

#[derive(Serialize)]
struct StatusOutput {
    platform: String,
    namespace: String,
    secure_option: SecureOption,
    secure_store: Option<String>,
    detection_error: Option<String>,
    selected_backend: Option<String>,
    selected_is_secure: Option<bool>,
    fallback_path: String,
}

/// Status command handler
pub fn cmd_status(
    config_path: Option<&Path>,
    secure: Option<SecureOption>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let provider = create_provider(&settings, secure)?;

    let (secure_store, detection_error) =
        match KeyringDetector.detect(provider.platform(), provider.namespace()) {
            Ok(native) => (Some(native.name().to_string()), None),
            Err(e) => (None, Some(e.to_string())),
        };
    let (selected_backend, selected_is_secure) =
        match provider.select_native(provider.default_option()) {
            Ok(native) => (Some(native.name().to_string()), Some(native.is_secure())),
            Err(_) => (None, None),
        };

    let output = StatusOutput {
        platform: provider.platform().to_string(),
        namespace: provider.namespace().to_string(),
        secure_option: provider.default_option(),
        secure_store,
        detection_error,
        selected_backend,
        selected_is_secure,
        fallback_path: provider.fallback_path().display().to_string(),
    };

    match format {
        OutputFormat::Table => print_table(&output),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_table(output: &StatusOutput) {
    println!("Secret Store Status");
    println!("===================\n");
    println!("Platform:        {}", output.platform);
    println!("Namespace:       {}", output.namespace);
    println!("Security level:  {}", output.secure_option);
    match (&output.secure_store, &output.detection_error) {
        (Some(name), _) => println!("Secure store:    {name} (available)"),
        (None, Some(err)) => println!("Secure store:    not available ({err})"),
        (None, None) => println!("Secure store:    not available"),
    }
    match (&output.selected_backend, output.selected_is_secure) {
        (Some(name), Some(true)) => println!("Selected:        {name}"),
        (Some(name), _) => println!("Selected:        {name} (INSECURE)"),
        (None, _) => println!("Selected:        none (a secure store is required)"),
    }
    println!("Fallback file:   {}", output.fallback_path);
}
