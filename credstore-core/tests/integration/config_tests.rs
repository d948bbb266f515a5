//! Settings persistence and provider construction from settings

use credstore_core::config::CONFIG_FILE_NAME;
use credstore_core::{
    ConfigError, ConfigManager, Credential, LoggingSettings, Platform, SecureOption,
    StorageProvider, StorageSettings, TracingLevel,
};

#[test]
fn settings_roundtrip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ConfigManager::with_config_dir(dir.path().join("credstore"));
    let settings = StorageSettings {
        namespace: "roundtrip".to_string(),
        secure_option: SecureOption::Must,
        fallback_path: Some(dir.path().join("fallback.json")),
        logging: LoggingSettings {
            level: TracingLevel::Debug,
            filter: Some("credstore::store=trace".to_string()),
            file: Some(dir.path().join("credstore.log")),
        },
    };

    manager.save_settings(&settings).unwrap();
    let content = std::fs::read_to_string(manager.settings_path()).unwrap();
    assert!(content.contains("namespace = \"roundtrip\""));
    assert!(content.contains("secure_option = \"must\""));
    assert!(manager.settings_path().ends_with(CONFIG_FILE_NAME));

    assert_eq!(manager.load_settings().unwrap(), settings);
}

#[test]
fn legacy_try_level_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ConfigManager::with_config_dir(dir.path().to_path_buf());
    std::fs::write(manager.settings_path(), "secure_option = \"try\"\n").unwrap();
    assert_eq!(
        manager.load_settings().unwrap().secure_option,
        SecureOption::Optional
    );
}

#[test]
fn unreadable_settings_reported() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ConfigManager::with_config_dir(dir.path().to_path_buf());
    std::fs::create_dir(manager.settings_path()).unwrap();
    assert!(matches!(manager.load_settings(), Err(ConfigError::Io(_))));
}

#[test]
fn provider_from_loaded_settings() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ConfigManager::with_config_dir(dir.path().to_path_buf());
    let fallback = dir.path().join("data").join("fallback.json");
    std::fs::write(
        manager.settings_path(),
        format!(
            "namespace = \"fromfile\"\nfallback_path = {:?}\n",
            fallback.to_string_lossy()
        ),
    )
    .unwrap();

    let settings = manager.load_settings().unwrap();
    let provider = StorageProvider::from_settings(&settings)
        .unwrap()
        .with_platform(Platform::Unsupported);
    assert_eq!(provider.namespace(), "fromfile");
    assert_eq!(provider.default_option(), SecureOption::Optional);

    let store = provider.default_credential_store().unwrap();
    assert!(store.add("svc", &Credential::new("alice", "s3cr3t")));
    assert!(fallback.exists());
}

#[test]
fn invalid_namespace_blocks_provider() {
    let settings = StorageSettings {
        namespace: "has:colon".to_string(),
        ..StorageSettings::default()
    };
    assert!(matches!(
        StorageProvider::from_settings(&settings),
        Err(ConfigError::Validation { .. })
    ));
}
