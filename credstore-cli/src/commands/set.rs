//! Store secret commands.

use std::path::Path;

use credstore_core::{
    Credential, Secret, SecretStore, SecureOption, StorageProvider, Token, TokenPair, TokenType,
};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::cli::SetCommands;
use crate::error::CliError;
use crate::util::{create_provider, load_settings, value_or_prompt};

/// Set command handler
pub fn cmd_set(
    config_path: Option<&Path>,
    secure: Option<SecureOption>,
    subcmd: SetCommands,
) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let provider = create_provider(&settings, secure)?;

    match subcmd {
        SetCommands::Credential {
            key,
            username,
            password,
        } => {
            let password = value_or_prompt(password, "Password")?;
            let credential = Credential::new(username, password.expose_secret());
            store(&provider, &key, &credential)
        }
        SetCommands::Token {
            key,
            token_type,
            value,
            target_identity,
        } => {
            let token_type = TokenType::from_friendly_name(&token_type)?;
            let value = value_or_prompt(value, "Token")?;
            let token = Token::with_target_identity(
                value.expose_secret(),
                token_type,
                target_identity.unwrap_or_else(Uuid::nil),
            )?;
            store(&provider, &key, &token)
        }
        SetCommands::TokenPair {
            key,
            access_token,
            refresh_token,
        } => {
            let access = value_or_prompt(access_token, "Access token")?;
            let refresh = value_or_prompt(refresh_token, "Refresh token")?;
            let pair = TokenPair::new(access.expose_secret(), refresh.expose_secret())?;
            store(&provider, &key, &pair)
        }
    }
}

fn store<T>(provider: &StorageProvider, key: &str, secret: &T) -> Result<(), CliError>
where
    T: Secret + credstore_core::XmlSecret,
{
    secret.validate()?;
    let store: Box<dyn SecretStore<T>> = provider.store(provider.default_option())?;
    if !store.is_secure() {
        tracing::warn!(backend = store.backend_id(), "Storing secret without encryption");
    }
    if store.add(key, secret) {
        println!("Stored {} '{key}' in {}", T::KIND, store.backend_id());
        Ok(())
    } else {
        Err(CliError::Secret(format!(
            "Failed to store {} '{key}' in {} (run with -v for details)",
            T::KIND,
            store.backend_id()
        )))
    }
}
