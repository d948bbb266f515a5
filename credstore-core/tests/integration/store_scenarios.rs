//! End-to-end store scenarios over every native store that runs in CI

use std::sync::Arc;

use credstore_core::codec;
use credstore_core::{
    BackedStore, Credential, InsecureFileStore, MemoryNativeStore, NativeStore, SecretError,
    SecretStore, Token, TokenPair, TokenType,
};
use uuid::Uuid;

fn native_stores(dir: &std::path::Path) -> Vec<Arc<dyn NativeStore>> {
    let memory: Arc<dyn NativeStore> = Arc::new(MemoryNativeStore::new());
    let file: Arc<dyn NativeStore> = Arc::new(InsecureFileStore::new(dir.join("store.json")));
    vec![memory, file]
}

#[test]
fn add_get_delete_scenario() {
    let dir = tempfile::tempdir().unwrap();
    for native in native_stores(dir.path()) {
        let store = BackedStore::<Credential>::new(native, "scenario").unwrap();
        let original = Credential::new("alice", "s3cr3t");

        assert!(store.add("svc", &original));
        assert_eq!(store.get("svc"), Some(original));
        assert!(store.delete("svc"));
        assert_eq!(store.get("svc"), None);
    }
}

#[test]
fn token_with_identity_survives_storage() {
    let dir = tempfile::tempdir().unwrap();
    let id = Uuid::new_v4();
    for native in native_stores(dir.path()) {
        let store = BackedStore::<Token>::new(native, "scenario").unwrap();
        let token = Token::with_target_identity("AbC123", TokenType::Federated, id).unwrap();

        assert!(store.add("federated", &token));
        let read = store.get("federated").unwrap();
        assert_eq!(read.value(), "AbC123");
        assert_eq!(read.target_identity(), id);
        assert_eq!(read.token_type(), TokenType::Federated);
    }
}

#[test]
fn same_logical_key_across_kinds() {
    let dir = tempfile::tempdir().unwrap();
    for native in native_stores(dir.path()) {
        let credentials = BackedStore::<Credential>::new(native.clone(), "scenario").unwrap();
        let tokens = BackedStore::<Token>::new(native.clone(), "scenario").unwrap();
        let pairs = BackedStore::<TokenPair>::new(native, "scenario").unwrap();

        let credential = Credential::new("bob", "hunter2");
        let token = Token::new("tok", TokenType::Personal).unwrap();
        let pair = TokenPair::new("access", "refresh").unwrap();
        assert!(credentials.add("shared", &credential));
        assert!(tokens.add("shared", &token));
        assert!(pairs.add("shared", &pair));

        assert_eq!(credentials.get("shared"), Some(credential));
        assert_eq!(tokens.get("shared"), Some(token));
        assert_eq!(pairs.get("shared"), Some(pair));

        assert!(tokens.delete("shared"));
        assert!(credentials.get("shared").is_some());
        assert!(pairs.get("shared").is_some());
    }
}

#[test]
fn corrupted_blob_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    for native in native_stores(dir.path()) {
        let store = BackedStore::<TokenPair>::new(native.clone(), "scenario").unwrap();
        let key = store.native_key("svc").unwrap();

        // Well-formed XML without a refreshToken child
        native
            .put(&key, "<value><accessToken>a</accessToken></value>")
            .unwrap();
        assert_eq!(store.get("svc"), None);
        assert!(matches!(
            store.try_get("svc"),
            Err(SecretError::MalformedSecret(_))
        ));

        // Repeated reads have no side effects
        assert_eq!(store.get("svc"), None);
        assert!(native.get(&key).unwrap().is_some());

        // Overwriting repairs the entry
        let pair = TokenPair::new("a", "r").unwrap();
        assert!(store.add("svc", &pair));
        assert_eq!(store.get("svc"), Some(pair));
    }
}

#[test]
fn stored_blob_is_the_canonical_document() {
    let native = Arc::new(MemoryNativeStore::new());
    let store = BackedStore::<Credential>::new(native.clone(), "scenario").unwrap();
    let credential = Credential::new("alice", "a<b&c");
    assert!(store.add("svc", &credential));

    let blob = native.get(&store.native_key("svc").unwrap()).unwrap().unwrap();
    assert_eq!(blob, codec::encode_document(&credential).unwrap());
    assert!(blob.contains("<Password>a&lt;b&amp;c</Password>"));
}

#[test]
fn file_store_shared_between_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.json");

    let writer = BackedStore::<Credential>::new(
        Arc::new(InsecureFileStore::new(&path)),
        "scenario",
    )
    .unwrap();
    assert!(writer.add("svc", &Credential::new("alice", "s3cr3t")));

    let reader =
        BackedStore::<Credential>::new(Arc::new(InsecureFileStore::new(&path)), "scenario")
            .unwrap();
    assert_eq!(reader.get("svc"), Some(Credential::new("alice", "s3cr3t")));
    assert!(!reader.is_secure());

    let other_namespace =
        BackedStore::<Credential>::new(Arc::new(InsecureFileStore::new(&path)), "elsewhere")
            .unwrap();
    assert_eq!(other_namespace.get("svc"), None);
}

#[test]
fn corrupt_file_fails_writes_and_reads_absent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store =
        BackedStore::<Credential>::new(Arc::new(InsecureFileStore::new(&path)), "scenario")
            .unwrap();
    assert_eq!(store.get("svc"), None);
    assert!(matches!(
        store.try_get("svc"),
        Err(SecretError::StoreOperationFailed(_))
    ));
    assert!(!store.add("svc", &Credential::new("a", "b")));
    assert!(!store.delete("svc"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json at all");
}
