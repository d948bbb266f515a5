//! Property tests for native key derivation

use std::sync::Arc;

use credstore_core::{
    BackedStore, Credential, MemoryNativeStore, NativeKey, SecretKind, SecretStore, TokenPair,
};
use proptest::prelude::*;

fn component() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,16}"
}

/// Logical keys may contain the separator
fn logical_key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:_ ./-]{0,32}"
}

proptest! {
    /// Property: distinct (type name, key) pairs never share a native key
    #[test]
    fn derivation_is_injective(
        ns in component(),
        t1 in component(),
        k1 in logical_key(),
        t2 in component(),
        k2 in logical_key(),
    ) {
        let a = NativeKey::new(ns.clone(), t1.clone(), k1.clone()).unwrap();
        let b = NativeKey::new(ns, t2.clone(), k2.clone()).unwrap();
        if (t1, k1) == (t2, k2) {
            prop_assert_eq!(a.target_name(), b.target_name());
        } else {
            prop_assert_ne!(a.target_name(), b.target_name());
        }
    }

    /// Property: the flat rendering parses back to the same key
    #[test]
    fn derivation_is_reversible(ns in component(), t in component(), k in logical_key()) {
        let key = NativeKey::new(ns, t, k).unwrap();
        prop_assert_eq!(NativeKey::parse(&key.target_name()), Some(key));
    }

    /// Property: a credential and a token pair under one logical key stay apart
    #[test]
    fn kinds_never_cross_read(
        key in logical_key(),
        username in "[a-z]{1,12}",
        access in "[a-zA-Z0-9]{1,24}",
    ) {
        let native = Arc::new(MemoryNativeStore::new());
        let credentials = BackedStore::<Credential>::new(native.clone(), "props").unwrap();
        let pairs = BackedStore::<TokenPair>::new(native.clone(), "props").unwrap();

        let credential = Credential::new(username, "pw");
        prop_assert!(credentials.add(&key, &credential));
        prop_assert_eq!(pairs.get(&key), None);

        let pair = TokenPair::new(access, "refresh").unwrap();
        prop_assert!(pairs.add(&key, &pair));
        prop_assert_eq!(credentials.get(&key), Some(credential));
        prop_assert_eq!(pairs.get(&key), Some(pair));
        prop_assert_eq!(native.len(), 2);
    }
}

#[test]
fn kind_type_names_are_distinct() {
    let names: Vec<&str> = SecretKind::ALL.iter().map(|k| k.type_name()).collect();
    assert_eq!(names, vec!["Credential", "Token", "OAuth2Token"]);
}
