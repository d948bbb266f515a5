//! Delete secret command.

use std::path::Path;

use credstore_core::{SecretKind, SecureOption};

use crate::error::CliError;
use crate::util::{create_provider, load_settings};

/// Delete command handler
pub fn cmd_delete(
    config_path: Option<&Path>,
    secure: Option<SecureOption>,
    kind: SecretKind,
    key: &str,
) -> Result<(), CliError> {
    let settings = load_settings(config_path)?;
    let provider = create_provider(&settings, secure)?;

    let (deleted, backend) = match kind {
        SecretKind::Credential => {
            let store = provider.default_credential_store()?;
            (store.delete(key), store.backend_id())
        }
        SecretKind::Token => {
            let store = provider.default_token_store()?;
            (store.delete(key), store.backend_id())
        }
        SecretKind::TokenPair => {
            let store = provider.default_token_pair_store()?;
            (store.delete(key), store.backend_id())
        }
    };

    if deleted {
        println!("Deleted {kind} '{key}' from {backend}");
        Ok(())
    } else {
        Err(CliError::Secret(format!(
            "Failed to delete {kind} '{key}' from {backend} (run with -v for details)"
        )))
    }
}
