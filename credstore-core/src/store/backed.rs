//! Shared store sequence over a native store

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::codec::{self, XmlSecret};
use crate::error::SecretResult;
use crate::secret::Secret;
use crate::trace_operation_debug;
use crate::tracing::span_names;

use super::native::{NativeKey, NativeStore, validate_component};
use super::{LOG_TARGET, SecretStore};

/// How a secret type is turned into a native blob and back
pub struct SecretFormat<T> {
    type_name: &'static str,
    serialize: fn(&T) -> SecretResult<String>,
    deserialize: fn(&str) -> SecretResult<T>,
}

impl<T> SecretFormat<T> {
    /// Creates a format from a type discriminator and codec functions
    #[must_use]
    pub const fn new(
        type_name: &'static str,
        serialize: fn(&T) -> SecretResult<String>,
        deserialize: fn(&str) -> SecretResult<T>,
    ) -> Self {
        Self {
            type_name,
            serialize,
            deserialize,
        }
    }

    /// Discriminator mixed into native keys
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl<T: Secret + XmlSecret> SecretFormat<T> {
    /// The canonical XML document format, discriminated by the secret kind
    #[must_use]
    pub fn xml() -> Self {
        Self::new(
            T::KIND.type_name(),
            codec::encode_document::<T>,
            codec::decode::<T>,
        )
    }
}

impl<T> Clone for SecretFormat<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SecretFormat<T> {}

impl<T> fmt::Debug for SecretFormat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretFormat")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A [`SecretStore`] over any [`NativeStore`]
///
/// Holds no secrets itself; every call is one round-trip to the native
/// store.
pub struct BackedStore<T> {
    native: Arc<dyn NativeStore>,
    namespace: String,
    format: SecretFormat<T>,
    _secret: PhantomData<fn() -> T>,
}

impl<T: Secret + XmlSecret> BackedStore<T> {
    /// Creates a store using the canonical XML format
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the namespace is empty or
    /// contains `:`.
    pub fn new(native: Arc<dyn NativeStore>, namespace: impl Into<String>) -> SecretResult<Self> {
        Self::with_format(native, namespace, SecretFormat::xml())
    }
}

impl<T: Secret> BackedStore<T> {
    /// Creates a store with a custom format
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the namespace or the format's
    /// type name is empty or contains `:`.
    pub fn with_format(
        native: Arc<dyn NativeStore>,
        namespace: impl Into<String>,
        format: SecretFormat<T>,
    ) -> SecretResult<Self> {
        let namespace = namespace.into();
        validate_component("namespace", &namespace)?;
        validate_component("type name", format.type_name)?;
        Ok(Self {
            native,
            namespace,
            format,
            _secret: PhantomData,
        })
    }

    /// The type discriminator of this store
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.format.type_name
    }

    /// Native key for a logical key
    ///
    /// # Errors
    ///
    /// Cannot fail once the store is constructed; the components were
    /// validated by the constructor.
    pub fn native_key(&self, key: &str) -> SecretResult<NativeKey> {
        NativeKey::new(self.namespace.as_str(), self.format.type_name, key)
    }

    /// Reads a secret, reporting failures instead of answering `None`
    ///
    /// [`SecretStore::get`] is this call with every error logged and
    /// mapped to `None`.
    ///
    /// # Errors
    ///
    /// Returns the native store's error, or the codec's error if the stored
    /// blob cannot be decoded.
    pub fn try_get(&self, key: &str) -> SecretResult<Option<T>> {
        let native_key = self.native_key(key)?;
        match self.native.get(&native_key)? {
            Some(blob) => (self.format.deserialize)(&blob).map(Some),
            None => Ok(None),
        }
    }

    fn try_add(&self, key: &str, secret: &T) -> SecretResult<()> {
        let native_key = self.native_key(key)?;
        let blob = (self.format.serialize)(secret)?;
        self.native.put(&native_key, &blob)
    }

    fn try_delete(&self, key: &str) -> SecretResult<bool> {
        let native_key = self.native_key(key)?;
        self.native.delete(&native_key)
    }
}

impl<T: Secret> SecretStore<T> for BackedStore<T> {
    fn get(&self, key: &str) -> Option<T> {
        let _span = trace_operation_debug!(
            span_names::STORE_GET,
            backend = self.native.name(),
            type_name = self.format.type_name,
            key = %key
        )
        .entered();

        match self.try_get(key) {
            Ok(found) => found,
            Err(e) if e.is_data_error() => {
                tracing::warn!(
                    target: LOG_TARGET,
                    backend = self.native.name(),
                    type_name = self.format.type_name,
                    key = %key,
                    error = %e,
                    "Stored secret could not be decoded, treating it as absent"
                );
                None
            }
            Err(e) => {
                tracing::error!(
                    target: LOG_TARGET,
                    backend = self.native.name(),
                    type_name = self.format.type_name,
                    key = %key,
                    error = %e,
                    "Failed to read secret"
                );
                None
            }
        }
    }

    fn add(&self, key: &str, secret: &T) -> bool {
        let _span = trace_operation_debug!(
            span_names::STORE_ADD,
            backend = self.native.name(),
            type_name = self.format.type_name,
            key = %key
        )
        .entered();

        match self.try_add(key, secret) {
            Ok(()) => {
                tracing::debug!(target: LOG_TARGET, key = %key, "Secret stored");
                true
            }
            Err(e) => {
                tracing::error!(
                    target: LOG_TARGET,
                    backend = self.native.name(),
                    type_name = self.format.type_name,
                    key = %key,
                    error = %e,
                    "Failed to add secret"
                );
                false
            }
        }
    }

    fn delete(&self, key: &str) -> bool {
        let _span = trace_operation_debug!(
            span_names::STORE_DELETE,
            backend = self.native.name(),
            type_name = self.format.type_name,
            key = %key
        )
        .entered();

        match self.try_delete(key) {
            Ok(existed) => {
                tracing::debug!(target: LOG_TARGET, key = %key, existed, "Secret deleted");
                true
            }
            Err(e) => {
                tracing::error!(
                    target: LOG_TARGET,
                    backend = self.native.name(),
                    type_name = self.format.type_name,
                    key = %key,
                    error = %e,
                    "Failed to delete secret"
                );
                false
            }
        }
    }

    fn is_secure(&self) -> bool {
        self.native.is_secure()
    }

    fn backend_id(&self) -> &'static str {
        self.native.name()
    }
}

impl<T> fmt::Debug for BackedStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackedStore")
            .field("backend", &self.native.name())
            .field("namespace", &self.namespace)
            .field("format", &self.format)
            .finish()
    }
}
