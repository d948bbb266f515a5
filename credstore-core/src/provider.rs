//! Backend selection
//!
//! [`StorageProvider`] turns a security level into exactly one store: the
//! platform secret service when it can be reached, otherwise either an
//! error ([`SecureOption::Must`]) or the insecure file fallback
//! ([`SecureOption::Optional`]). Detection runs on every request; no
//! backend handle outlives the store it was handed to.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::XmlSecret;
use crate::config::StorageSettings;
use crate::error::{ConfigResult, SecretError, SecretResult};
use crate::secret::{Credential, Secret, Token, TokenPair};
use crate::store::{
    BackedStore, InsecureFileStore, KeyringNativeStore, LOG_TARGET, NativePlatform, NativeStore,
    SecretStore, validate_component,
};
use crate::trace_operation;
use crate::tracing::span_names;

/// Environment variable that must be set for the Secret Service to be
/// reachable on Linux
pub const DBUS_SESSION_ENV: &str = "DBUS_SESSION_BUS_ADDRESS";

/// Requested security level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecureOption {
    /// A secure store is required; selection fails without one
    Must,
    /// Prefer a secure store, fall back to the insecure file
    #[default]
    #[serde(alias = "try")]
    Optional,
}

impl SecureOption {
    /// Lowercase name, as used in settings and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Must => "must",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for SecureOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecureOption {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "must" => Ok(Self::Must),
            "optional" | "try" => Ok(Self::Optional),
            _ => Err(SecretError::Validation(format!(
                "unknown security level '{s}', expected 'must' or 'optional'"
            ))),
        }
    }
}

/// Host platform family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows
    Windows,
    /// Linux and other Secret Service desktops
    Linux,
    /// macOS
    MacOs,
    /// Anything without a supported native store
    Unsupported,
}

impl Platform {
    /// Platform of the running build
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(any(target_os = "linux", target_os = "freebsd", target_os = "openbsd")) {
            Self::Linux
        } else {
            Self::Unsupported
        }
    }

    /// Preferred secure store of this platform
    #[must_use]
    pub const fn native_platform(self) -> Option<NativePlatform> {
        match self {
            Self::Windows => Some(NativePlatform::WindowsCredentialManager),
            Self::Linux => Some(NativePlatform::SecretService),
            Self::MacOs => Some(NativePlatform::MacosKeychain),
            Self::Unsupported => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => write!(f, "Windows"),
            Self::Linux => write!(f, "Linux"),
            Self::MacOs => write!(f, "macOS"),
            Self::Unsupported => write!(f, "unsupported platform"),
        }
    }
}

/// Finds the secure native store of a platform
///
/// A reachable store with no entries is a successful detection. Only an
/// unreachable or missing store is an error.
pub trait NativeStoreDetector: Send + Sync {
    /// Opens the secure store of `platform`
    ///
    /// # Errors
    ///
    /// Returns `SecretError::BackendUnavailable` if no secure store can be
    /// reached.
    fn detect(&self, platform: Platform, namespace: &str) -> SecretResult<Arc<dyn NativeStore>>;
}

/// Detector probing the platform store through `keyring`
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyringDetector;

impl KeyringDetector {
    /// Detection with an explicit D-Bus session address in place of the
    /// process environment
    ///
    /// # Errors
    ///
    /// Returns `SecretError::BackendUnavailable` if the platform has no
    /// secure store, Linux has no session address, or the probe fails.
    pub fn detect_with_session(
        &self,
        platform: Platform,
        namespace: &str,
        session_address: Option<&OsStr>,
    ) -> SecretResult<Arc<dyn NativeStore>> {
        let native = platform.native_platform().ok_or_else(|| {
            SecretError::BackendUnavailable(format!("no secure store on {platform}"))
        })?;

        if platform == Platform::Linux && session_address.is_none_or(OsStr::is_empty) {
            return Err(SecretError::BackendUnavailable(format!(
                "{native} needs a D-Bus session ({DBUS_SESSION_ENV} is not set)"
            )));
        }

        let store = KeyringNativeStore::probe(native, namespace)?;
        Ok(Arc::new(store))
    }
}

impl NativeStoreDetector for KeyringDetector {
    fn detect(&self, platform: Platform, namespace: &str) -> SecretResult<Arc<dyn NativeStore>> {
        let session = std::env::var_os(DBUS_SESSION_ENV);
        self.detect_with_session(platform, namespace, session.as_deref())
    }
}

/// Hands out stores according to a security level
pub struct StorageProvider {
    namespace: String,
    default_option: SecureOption,
    fallback_path: PathBuf,
    platform: Platform,
    detector: Arc<dyn NativeStoreDetector>,
}

impl StorageProvider {
    /// Creates a provider for the current platform
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the namespace is empty or
    /// contains `:`.
    pub fn new(namespace: impl Into<String>, fallback_path: impl Into<PathBuf>) -> SecretResult<Self> {
        let namespace = namespace.into();
        validate_component("namespace", &namespace)?;
        Ok(Self {
            namespace,
            default_option: SecureOption::default(),
            fallback_path: fallback_path.into(),
            platform: Platform::current(),
            detector: Arc::new(KeyringDetector),
        })
    }

    /// Creates a provider from validated settings
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid or the fallback path
    /// cannot be resolved.
    pub fn from_settings(settings: &StorageSettings) -> ConfigResult<Self> {
        settings.validate()?;
        let fallback_path = settings.resolved_fallback_path()?;
        Ok(Self {
            namespace: settings.namespace.clone(),
            default_option: settings.secure_option,
            fallback_path,
            platform: Platform::current(),
            detector: Arc::new(KeyringDetector),
        })
    }

    /// Replaces the native store detector
    #[must_use]
    pub fn with_detector(mut self, detector: impl NativeStoreDetector + 'static) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    /// Overrides the detected platform
    #[must_use]
    pub const fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the level used by the `default_*` accessors
    #[must_use]
    pub const fn with_default_option(mut self, option: SecureOption) -> Self {
        self.default_option = option;
        self
    }

    /// Namespace prefixed to every native key
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Level used when the caller does not pass one
    #[must_use]
    pub const fn default_option(&self) -> SecureOption {
        self.default_option
    }

    /// Platform the provider selects for
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Location of the insecure fallback file
    #[must_use]
    pub fn fallback_path(&self) -> &Path {
        &self.fallback_path
    }

    /// Selects the native store for `option`
    ///
    /// # Errors
    ///
    /// Returns `SecretError::BackendUnavailable` if `option` is
    /// [`SecureOption::Must`] and no secure store can be reached.
    pub fn select_native(&self, option: SecureOption) -> SecretResult<Arc<dyn NativeStore>> {
        let _span = trace_operation!(
            span_names::PROVIDER_SELECT,
            secure_option = %option,
            platform = %self.platform
        )
        .entered();

        match self.detector.detect(self.platform, &self.namespace) {
            Ok(native) => {
                tracing::debug!(target: LOG_TARGET, backend = native.name(), "Secure store selected");
                Ok(native)
            }
            Err(e) => match option {
                SecureOption::Must => {
                    tracing::error!(
                        target: LOG_TARGET,
                        platform = %self.platform,
                        error = %e,
                        "No secure store available"
                    );
                    Err(SecretError::BackendUnavailable(format!(
                        "a secure store is required but none is available on {}: {e}",
                        self.platform
                    )))
                }
                SecureOption::Optional => {
                    tracing::warn!(
                        target: LOG_TARGET,
                        platform = %self.platform,
                        path = %self.fallback_path.display(),
                        error = %e,
                        "No secure store available, falling back to insecure file storage"
                    );
                    Ok(Arc::new(InsecureFileStore::new(self.fallback_path.clone())))
                }
            },
        }
    }

    /// Store for secrets of type `T`
    ///
    /// # Errors
    ///
    /// See [`StorageProvider::select_native`].
    pub fn store<T: Secret + XmlSecret>(
        &self,
        option: SecureOption,
    ) -> SecretResult<Box<dyn SecretStore<T>>> {
        let native = self.select_native(option)?;
        Ok(Box::new(BackedStore::<T>::new(native, self.namespace.as_str())?))
    }

    /// Store for username/password credentials
    ///
    /// # Errors
    ///
    /// See [`StorageProvider::select_native`].
    pub fn credential_store(
        &self,
        option: SecureOption,
    ) -> SecretResult<Box<dyn SecretStore<Credential>>> {
        self.store(option)
    }

    /// Store for single tokens
    ///
    /// # Errors
    ///
    /// See [`StorageProvider::select_native`].
    pub fn token_store(&self, option: SecureOption) -> SecretResult<Box<dyn SecretStore<Token>>> {
        self.store(option)
    }

    /// Store for access/refresh token pairs
    ///
    /// # Errors
    ///
    /// See [`StorageProvider::select_native`].
    pub fn token_pair_store(
        &self,
        option: SecureOption,
    ) -> SecretResult<Box<dyn SecretStore<TokenPair>>> {
        self.store(option)
    }

    /// Credential store at the default level
    ///
    /// # Errors
    ///
    /// See [`StorageProvider::select_native`].
    pub fn default_credential_store(&self) -> SecretResult<Box<dyn SecretStore<Credential>>> {
        self.credential_store(self.default_option)
    }

    /// Token store at the default level
    ///
    /// # Errors
    ///
    /// See [`StorageProvider::select_native`].
    pub fn default_token_store(&self) -> SecretResult<Box<dyn SecretStore<Token>>> {
        self.token_store(self.default_option)
    }

    /// Token pair store at the default level
    ///
    /// # Errors
    ///
    /// See [`StorageProvider::select_native`].
    pub fn default_token_pair_store(&self) -> SecretResult<Box<dyn SecretStore<TokenPair>>> {
        self.token_pair_store(self.default_option)
    }
}

impl fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageProvider")
            .field("namespace", &self.namespace)
            .field("default_option", &self.default_option)
            .field("fallback_path", &self.fallback_path)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}
