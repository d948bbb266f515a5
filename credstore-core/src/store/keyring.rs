//! Platform secret stores via the `keyring` crate
//!
//! One native store type covers Windows Credential Manager, the Secret
//! Service API (GNOME Keyring, KDE Wallet) and the macOS Keychain. Only the
//! store matching the build target can be opened.

use std::fmt;

use keyring::Entry;

use crate::error::{SecretError, SecretResult};

use super::native::{NativeKey, NativeStore};

/// Logical key used to check that the platform store answers
const PROBE_KEY: &str = "__credstore_probe__";

/// Platform secret store reachable through `keyring`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativePlatform {
    /// Windows Credential Manager
    WindowsCredentialManager,
    /// Secret Service (GNOME Keyring) over D-Bus
    SecretService,
    /// macOS Keychain
    MacosKeychain,
}

impl NativePlatform {
    /// The store compiled into this build, if any
    #[must_use]
    pub const fn for_build_target() -> Option<Self> {
        if cfg!(target_os = "windows") {
            Some(Self::WindowsCredentialManager)
        } else if cfg!(target_os = "macos") {
            Some(Self::MacosKeychain)
        } else if cfg!(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd")) {
            Some(Self::SecretService)
        } else {
            None
        }
    }

    /// Stable identifier
    #[must_use]
    pub const fn backend_id(self) -> &'static str {
        match self {
            Self::WindowsCredentialManager => "windows-credential-manager",
            Self::SecretService => "secret-service",
            Self::MacosKeychain => "macos-keychain",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::WindowsCredentialManager => "Windows Credential Manager",
            Self::SecretService => "GNOME Keyring (Secret Service)",
            Self::MacosKeychain => "macOS Keychain",
        }
    }
}

impl fmt::Display for NativePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Native store backed by the platform secret service
#[derive(Debug, Clone)]
pub struct KeyringNativeStore {
    platform: NativePlatform,
}

impl KeyringNativeStore {
    /// Opens the platform store and checks that it answers
    ///
    /// A reachable store with no entries is a success; only an unreachable
    /// service or a platform mismatch fails.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::BackendUnavailable` if `platform` is not the
    /// store of this build or the service does not respond.
    pub fn probe(platform: NativePlatform, namespace: &str) -> SecretResult<Self> {
        if NativePlatform::for_build_target() != Some(platform) {
            return Err(SecretError::BackendUnavailable(format!(
                "{platform} is not available on this platform"
            )));
        }

        let store = Self { platform };
        let key = NativeKey::new(namespace, "Probe", PROBE_KEY)?;
        match store.entry(&key)?.get_password() {
            Ok(_) | Err(keyring::Error::NoEntry) => {
                tracing::debug!(backend = platform.backend_id(), "Native secret store detected");
                Ok(store)
            }
            Err(e) => Err(SecretError::BackendUnavailable(format!(
                "{platform} did not respond: {e}"
            ))),
        }
    }

    /// The platform store in use
    #[must_use]
    pub const fn platform(&self) -> NativePlatform {
        self.platform
    }

    fn entry(&self, key: &NativeKey) -> SecretResult<Entry> {
        let entry = if self.platform == NativePlatform::WindowsCredentialManager {
            // Credential Manager is keyed by a flat target name
            Entry::new_with_target(&key.target_name(), &key.service(), key.key())
        } else {
            Entry::new(&key.service(), key.key())
        };
        entry.map_err(|e| map_keyring_error(&e, self.platform))
    }
}

/// Maps a `keyring` error to the store error taxonomy
fn map_keyring_error(e: &keyring::Error, platform: NativePlatform) -> SecretError {
    match e {
        keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
            SecretError::BackendUnavailable(format!("{platform}: {e}"))
        }
        _ => SecretError::StoreOperationFailed(format!("{platform}: {e}")),
    }
}

impl NativeStore for KeyringNativeStore {
    fn put(&self, key: &NativeKey, blob: &str) -> SecretResult<()> {
        self.entry(key)?
            .set_password(blob)
            .map_err(|e| map_keyring_error(&e, self.platform))
    }

    fn get(&self, key: &NativeKey) -> SecretResult<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(blob) => Ok(Some(blob)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(map_keyring_error(&e, self.platform)),
        }
    }

    fn delete(&self, key: &NativeKey) -> SecretResult<bool> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(map_keyring_error(&e, self.platform)),
        }
    }

    fn is_secure(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        self.platform.backend_id()
    }
}
