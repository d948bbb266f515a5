//! Backend selection under each security level

use std::sync::Arc;

use credstore_core::{
    Credential, MemoryNativeStore, NativeStore, NativeStoreDetector, Platform, SecretError,
    SecretResult, SecureOption, StorageProvider, TokenPair,
};

/// Detector that never finds a secure store
struct NoSecureStore;

impl NativeStoreDetector for NoSecureStore {
    fn detect(&self, platform: Platform, _namespace: &str) -> SecretResult<Arc<dyn NativeStore>> {
        Err(SecretError::BackendUnavailable(format!(
            "daemon unreachable on {platform}"
        )))
    }
}

/// Detector that finds an empty but reachable store
struct EmptySecureStore(Arc<MemoryNativeStore>);

impl NativeStoreDetector for EmptySecureStore {
    fn detect(&self, _platform: Platform, _namespace: &str) -> SecretResult<Arc<dyn NativeStore>> {
        Ok(self.0.clone())
    }
}

#[test]
fn must_fails_loudly_without_secure_store() {
    let dir = tempfile::tempdir().unwrap();
    let provider = StorageProvider::new("app", dir.path().join("fallback.json"))
        .unwrap()
        .with_detector(NoSecureStore);

    for result in [
        provider.credential_store(SecureOption::Must).map(|_| ()),
        provider.token_store(SecureOption::Must).map(|_| ()),
        provider.token_pair_store(SecureOption::Must).map(|_| ()),
    ] {
        assert!(matches!(result, Err(SecretError::BackendUnavailable(_))));
    }
    assert!(!dir.path().join("fallback.json").exists());
}

#[test]
fn optional_falls_back_to_insecure_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fallback.json");
    let provider = StorageProvider::new("app", &path)
        .unwrap()
        .with_detector(NoSecureStore);

    let store = provider.credential_store(SecureOption::Optional).unwrap();
    assert!(!store.is_secure());
    assert!(store.add("svc", &Credential::new("alice", "s3cr3t")));

    // A second selection reads what the first one wrote
    let again = provider.credential_store(SecureOption::Optional).unwrap();
    assert_eq!(again.get("svc"), Some(Credential::new("alice", "s3cr3t")));
    assert!(path.exists());
}

#[test]
fn empty_secure_store_is_not_a_detection_failure() {
    let dir = tempfile::tempdir().unwrap();
    let native = Arc::new(MemoryNativeStore::new());
    let provider = StorageProvider::new("app", dir.path().join("fallback.json"))
        .unwrap()
        .with_detector(EmptySecureStore(native.clone()));

    let store = provider.token_pair_store(SecureOption::Must).unwrap();
    assert!(store.is_secure());
    assert_eq!(store.get("anything"), None);

    let pair = TokenPair::new("a", "r").unwrap();
    assert!(store.add("svc", &pair));
    assert_eq!(native.len(), 1);
    assert_eq!(
        native.keys()[0].target_name(),
        "app:OAuth2Token:svc"
    );
}

#[test]
fn default_option_drives_default_accessors() {
    let dir = tempfile::tempdir().unwrap();
    let provider = StorageProvider::new("app", dir.path().join("fallback.json"))
        .unwrap()
        .with_detector(NoSecureStore)
        .with_default_option(SecureOption::Must);
    assert!(provider.default_credential_store().is_err());

    let provider = provider.with_default_option(SecureOption::Optional);
    assert!(provider.default_credential_store().is_ok());
}

#[test]
fn unsupported_platform_uses_fallback_with_default_detector() {
    let dir = tempfile::tempdir().unwrap();
    let provider = StorageProvider::new("app", dir.path().join("fallback.json"))
        .unwrap()
        .with_platform(Platform::Unsupported);

    assert!(provider.credential_store(SecureOption::Must).is_err());
    let store = provider.credential_store(SecureOption::Optional).unwrap();
    assert_eq!(store.backend_id(), "insecure-file");
}
