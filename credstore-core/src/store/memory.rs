//! In-process native store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{SecretError, SecretResult};

use super::native::{NativeKey, NativeStore};

/// Native store kept in process memory
///
/// Nothing survives the process. Useful for tests and for callers that
/// need an ephemeral store; the failure switch simulates an unreachable
/// secret service.
#[derive(Debug)]
pub struct MemoryNativeStore {
    entries: Mutex<HashMap<NativeKey, String>>,
    secure: bool,
    failing: AtomicBool,
}

impl Default for MemoryNativeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryNativeStore {
    /// Creates an empty store that reports itself as secure
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            secure: true,
            failing: AtomicBool::new(false),
        }
    }

    /// Creates an empty store that reports itself as insecure
    #[must_use]
    pub fn insecure() -> Self {
        Self {
            secure: false,
            ..Self::new()
        }
    }

    /// Makes every subsequent operation fail as if the service were down
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored blobs
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// All keys currently stored, sorted
    #[must_use]
    pub fn keys(&self) -> Vec<NativeKey> {
        let mut keys: Vec<_> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<NativeKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> SecretResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(SecretError::BackendUnavailable(
                "in-memory store switched to failing".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl NativeStore for MemoryNativeStore {
    fn put(&self, key: &NativeKey, blob: &str) -> SecretResult<()> {
        self.check()?;
        self.entries().insert(key.clone(), blob.to_string());
        Ok(())
    }

    fn get(&self, key: &NativeKey) -> SecretResult<Option<String>> {
        self.check()?;
        Ok(self.entries().get(key).cloned())
    }

    fn delete(&self, key: &NativeKey) -> SecretResult<bool> {
        self.check()?;
        Ok(self.entries().remove(key).is_some())
    }

    fn is_secure(&self) -> bool {
        self.secure
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let store = MemoryNativeStore::new();
        let key = NativeKey::new("ns", "Credential", "k").unwrap();

        assert_eq!(store.get(&key).unwrap(), None);
        store.put(&key, "blob").unwrap();
        assert_eq!(store.get(&key).unwrap().as_deref(), Some("blob"));
        assert!(store.delete(&key).unwrap());
        assert!(!store.delete(&key).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failing_switch() {
        let store = MemoryNativeStore::new();
        let key = NativeKey::new("ns", "Credential", "k").unwrap();
        store.set_failing(true);
        assert!(matches!(
            store.put(&key, "x"),
            Err(SecretError::BackendUnavailable(_))
        ));
        store.set_failing(false);
        assert!(store.put(&key, "x").is_ok());
    }
}
