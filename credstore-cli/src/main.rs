//! `credstore` CLI - Command-line interface for OS-native secret storage
//!
//! Stores, reads, and deletes credentials, tokens, and token pairs through
//! the platform secret store, falling back to an insecure file when allowed.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use credstore_core::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let tracing_config = logging_config(&cli);
    if let Err(e) = init_tracing(&tracing_config) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let result = commands::dispatch(config_path, cli.secure.map(Into::into), cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

/// Logging follows the settings file, raised by `-v` and lowered by `-q`
fn logging_config(cli: &Cli) -> TracingConfig {
    let base = util::load_settings(cli.config.as_deref())
        .map(|s| s.logging.to_tracing_config())
        .unwrap_or_default();

    if cli.quiet {
        base.with_level(TracingLevel::Error)
    } else if cli.verbose > 0 {
        let level = base.level.raised_by(cli.verbose);
        TracingConfig {
            filter: None,
            ..base.with_level(level)
        }
    } else {
        base
    }
}
