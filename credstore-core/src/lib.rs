//! `credstore` Core Library
//!
//! Persists small secrets (credentials, tokens, OAuth token pairs) in the
//! platform secret store, with a canonical XML format shared by every
//! backend and an insecure file fallback when no secure store is around.
//!
//! # Crate Structure
//!
//! - [`secret`] - Immutable secret values and their validation rules
//! - [`codec`] - The canonical XML projection of each secret kind
//! - [`store`] - The store contract, the native store boundary, backends
//! - [`provider`] - Backend selection by security level and platform
//! - [`config`] - Settings file loading and saving
//! - [`tracing`] - Logging setup for binaries
//!
//! # Example
//!
//! ```no_run
//! use credstore_core::{Credential, SecureOption, StorageProvider};
//!
//! let provider = StorageProvider::new("myapp", "/tmp/myapp-secrets.json")?;
//! let store = provider.credential_store(SecureOption::Optional)?;
//! store.add("svc", &Credential::new("alice", "s3cr3t"));
//! assert_eq!(store.get("svc").map(|c| c.username().to_string()), Some("alice".into()));
//! # Ok::<(), credstore_core::SecretError>(())
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod config;
pub mod error;
pub mod provider;
pub mod secret;
pub mod store;
pub mod tracing;

pub use codec::{XmlElement, XmlSecret, decode, encode, encode_document};
pub use config::{ConfigManager, LoggingSettings, StorageSettings};
pub use error::{ConfigError, ConfigResult, CredStoreError, SecretError, SecretResult};
pub use provider::{
    KeyringDetector, NativeStoreDetector, Platform, SecureOption, StorageProvider,
};
pub use secret::{
    Credential, PASSWORD_MAX_LENGTH, Secret, SecretKind, Token, TokenPair, TokenType,
    USERNAME_MAX_LENGTH,
};
pub use store::{
    BackedStore, InsecureFileStore, KeyringNativeStore, MemoryNativeStore, NativeKey,
    NativePlatform, NativeStore, SecretFormat, SecretStore,
};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
};
