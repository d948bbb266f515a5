//! Read secret command.

use std::path::Path;

use credstore_core::{Credential, SecretKind, SecureOption, Token, TokenPair};
use serde::Serialize;
use uuid::Uuid;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{create_provider, load_settings, mask};

/// JSON shape of a secret read back from the store
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SecretOutput {
    Credential {
        key: String,
        username: String,
        password: String,
    },
    Token {
        key: String,
        token_type: String,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_identity: Option<Uuid>,
    },
    TokenPair {
        key: String,
        access_token: String,
        refresh_token: String,
    },
}

impl SecretOutput {
    fn credential(key: &str, credential: &Credential, show: bool) -> Self {
        Self::Credential {
            key: key.to_string(),
            username: credential.username().to_string(),
            password: mask(credential.password(), show),
        }
    }

    fn token(key: &str, token: &Token, show: bool) -> Self {
        Self::Token {
            key: key.to_string(),
            token_type: token.token_type().friendly_name().to_string(),
            value: mask(token.value(), show),
            target_identity: token
                .has_target_identity()
                .then_some(token.target_identity()),
        }
    }

    fn token_pair(key: &str, pair: &TokenPair, show: bool) -> Self {
        Self::TokenPair {
            key: key.to_string(),
            access_token: mask(pair.access_token().value(), show),
            refresh_token: mask(pair.refresh_token().value(), show),
        }
    }
}

/// Get command handler
pub fn cmd_get(
    config_path: Option<&Path>,
    secure: Option<SecureOption>,
    kind: SecretKind,
    key: &str,
    format: OutputFormat,
    show_secret: bool,
) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let provider = create_provider(&settings, secure)?;

    let found = match kind {
        SecretKind::Credential => provider
            .default_credential_store()?
            .get(key)
            .map(|c| SecretOutput::credential(key, &c, show_secret)),
        SecretKind::Token => provider
            .default_token_store()?
            .get(key)
            .map(|t| SecretOutput::token(key, &t, show_secret)),
        SecretKind::TokenPair => provider
            .default_token_pair_store()?
            .get(key)
            .map(|p| SecretOutput::token_pair(key, &p, show_secret)),
    };

    let output = found.ok_or_else(|| CliError::NotFound {
        kind: kind.to_string(),
        key: key.to_string(),
    })?;

    match format {
        OutputFormat::Table => print_table(&output),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| CliError::Secret(format!("Failed to serialize to JSON: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn print_table(output: &SecretOutput) {
    match output {
        SecretOutput::Credential {
            key,
            username,
            password,
        } => {
            println!("Key:       {key}");
            println!("Username:  {username}");
            println!("Password:  {password}");
        }
        SecretOutput::Token {
            key,
            token_type,
            value,
            target_identity,
        } => {
            println!("Key:       {key}");
            println!("Type:      {token_type}");
            println!("Value:     {value}");
            if let Some(id) = target_identity {
                println!("Identity:  {id}");
            }
        }
        SecretOutput::TokenPair {
            key,
            access_token,
            refresh_token,
        } => {
            println!("Key:       {key}");
            println!("Access:    {access_token}");
            println!("Refresh:   {refresh_token}");
        }
    }
}
