//! Command handler modules for the CLI.

mod config;
mod delete;
mod get;
mod set;
mod status;

use std::path::Path;

use credstore_core::SecureOption;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(
    config_path: Option<&Path>,
    secure: Option<SecureOption>,
    command: Commands,
) -> Result<(), CliError> {
    match command {
        Commands::Status { format } => status::cmd_status(config_path, secure, format),
        Commands::Get {
            kind,
            key,
            format,
            show_secret,
        } => get::cmd_get(config_path, secure, kind.into(), &key, format, show_secret),
        Commands::Set(subcmd) => set::cmd_set(config_path, secure, subcmd),
        Commands::Delete { kind, key } => delete::cmd_delete(config_path, secure, kind.into(), &key),
        Commands::Config(subcmd) => config::cmd_config(config_path, subcmd),
    }
}
