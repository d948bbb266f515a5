//! Boundary to native secret stores

use std::fmt;

use crate::error::{SecretError, SecretResult};

/// Key under which a secret lives in a native store
///
/// Composed of the application namespace, the secret type discriminator,
/// and the caller's logical key. Namespace and type name never contain
/// [`NativeKey::SEPARATOR`], so the flat rendering is injective and can be
/// split back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeKey {
    namespace: String,
    type_name: String,
    key: String,
}

impl NativeKey {
    /// Separator between the parts of the flat rendering
    pub const SEPARATOR: char = ':';

    /// Builds a native key
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the namespace or type name is
    /// empty or contains the separator.
    pub fn new(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        key: impl Into<String>,
    ) -> SecretResult<Self> {
        let namespace = namespace.into();
        let type_name = type_name.into();
        validate_component("namespace", &namespace)?;
        validate_component("type name", &type_name)?;
        Ok(Self {
            namespace,
            type_name,
            key: key.into(),
        })
    }

    /// Parses the flat rendering produced by [`NativeKey::target_name`]
    #[must_use]
    pub fn parse(target: &str) -> Option<Self> {
        let mut parts = target.splitn(3, Self::SEPARATOR);
        let namespace = parts.next()?;
        let type_name = parts.next()?;
        let key = parts.next()?;
        Self::new(namespace, type_name, key).ok()
    }

    /// Application namespace
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Secret type discriminator
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Caller's logical key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Service name: `namespace:type_name`
    #[must_use]
    pub fn service(&self) -> String {
        format!("{}{}{}", self.namespace, Self::SEPARATOR, self.type_name)
    }

    /// Flat rendering: `namespace:type_name:key`
    #[must_use]
    pub fn target_name(&self) -> String {
        format!("{}{}{}", self.service(), Self::SEPARATOR, self.key)
    }
}

impl fmt::Display for NativeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target_name())
    }
}

/// Checks a namespace or type name component
///
/// # Errors
///
/// Returns `SecretError::Validation` if the value is blank or contains the
/// separator.
pub(crate) fn validate_component(field: &str, value: &str) -> SecretResult<()> {
    if value.trim().is_empty() {
        return Err(SecretError::Validation(format!("the {field} is empty")));
    }
    if value.contains(NativeKey::SEPARATOR) {
        return Err(SecretError::Validation(format!(
            "the {field} '{value}' contains '{}'",
            NativeKey::SEPARATOR
        )));
    }
    Ok(())
}

/// Flat key to blob interface of a native secret store
///
/// Implementations must be safe to share between threads; they do not
/// need cross-key locking.
pub trait NativeStore: Send + Sync {
    /// Writes `blob` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `SecretError::BackendUnavailable` if the store cannot be
    /// reached, `SecretError::StoreOperationFailed` otherwise.
    fn put(&self, key: &NativeKey, blob: &str) -> SecretResult<()>;

    /// Reads the blob under `key`, `None` if absent
    ///
    /// # Errors
    ///
    /// Returns `SecretError::BackendUnavailable` if the store cannot be
    /// reached, `SecretError::StoreOperationFailed` otherwise.
    fn get(&self, key: &NativeKey) -> SecretResult<Option<String>>;

    /// Removes the blob under `key`; returns whether it existed
    ///
    /// # Errors
    ///
    /// Returns `SecretError::BackendUnavailable` if the store cannot be
    /// reached, `SecretError::StoreOperationFailed` otherwise.
    fn delete(&self, key: &NativeKey) -> SecretResult<bool>;

    /// Whether secrets are protected at rest
    fn is_secure(&self) -> bool;

    /// Short identifier of the store
    fn name(&self) -> &'static str;
}
