//! Configuration file commands.

use std::path::Path;

use credstore_core::StorageSettings;

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::util::create_config_manager;

/// Config command handler
pub fn cmd_config(config_path: Option<&Path>, subcmd: ConfigCommands) -> Result<(), CliError> {
    match subcmd {
        ConfigCommands::Show => cmd_config_show(config_path),
        ConfigCommands::Init {
            namespace,
            fallback_path,
            force,
        } => cmd_config_init(config_path, namespace, fallback_path, force),
    }
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let manager = create_config_manager(config_path)?;
    let settings = manager.load_settings()?;
    let fallback = settings.resolved_fallback_path()?;

    println!("Settings file:   {}", manager.settings_path().display());
    println!("Namespace:       {}", settings.namespace);
    println!("Security level:  {}", settings.secure_option);
    println!("Fallback file:   {}", fallback.display());
    println!("Log level:       {}", settings.logging.level);
    if let Some(filter) = &settings.logging.filter {
        println!("Log filter:      {filter}");
    }
    if let Some(file) = &settings.logging.file {
        println!("Log file:        {}", file.display());
    }
    Ok(())
}

fn cmd_config_init(
    config_path: Option<&Path>,
    namespace: Option<String>,
    fallback_path: Option<std::path::PathBuf>,
    force: bool,
) -> Result<(), CliError> {
    let manager = create_config_manager(config_path)?;
    let path = manager.settings_path();
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let defaults = StorageSettings::default();
    let settings = StorageSettings {
        namespace: namespace.unwrap_or(defaults.namespace),
        fallback_path,
        ..defaults
    };
    manager.save_settings(&settings)?;
    println!("Wrote {}", path.display());
    Ok(())
}
