//! Secret stores
//!
//! [`SecretStore`] is the contract callers program against. Every backend
//! is a [`BackedStore`]: one shared get/add/delete sequence running the
//! canonical codec over a [`NativeStore`], which is the flat key to blob
//! interface of the platform secret service (or the insecure file
//! fallback).
//!
//! Stores never propagate errors: `get` answers `None` when the entry is
//! missing or cannot be decoded, `add`/`delete` answer `false` when the
//! native store fails. Every swallowed failure is logged through
//! `tracing` under the `credstore::store` target.

mod backed;
mod file;
mod keyring;
mod memory;
mod native;

pub use backed::{BackedStore, SecretFormat};
pub use file::InsecureFileStore;
pub use keyring::{KeyringNativeStore, NativePlatform};
pub use memory::MemoryNativeStore;
pub use native::{NativeKey, NativeStore};
pub(crate) use native::validate_component;

use crate::secret::Secret;

/// Log target for every store event
pub const LOG_TARGET: &str = "credstore::store";

/// Storage contract for one kind of secret
pub trait SecretStore<T: Secret>: Send + Sync {
    /// Reads the secret stored under `key`
    ///
    /// Returns `None` if nothing is stored or the stored value is unusable.
    fn get(&self, key: &str) -> Option<T>;

    /// Stores `secret` under `key`, replacing any previous value
    ///
    /// Returns `false` if the backend failed.
    fn add(&self, key: &str, secret: &T) -> bool;

    /// Removes the secret stored under `key`
    ///
    /// Removing a missing key succeeds. Returns `false` if the backend failed.
    fn delete(&self, key: &str) -> bool;

    /// Whether the backing store protects secrets at rest
    fn is_secure(&self) -> bool;

    /// Short identifier of the backend, for diagnostics
    fn backend_id(&self) -> &'static str;
}
