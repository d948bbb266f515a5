//! Configuration management for `credstore`
//!
//! [`StorageSettings`] is read from and written to a TOML file by
//! [`ConfigManager`]. A missing file yields the defaults.

mod manager;
pub mod settings;

pub use manager::{CONFIG_FILE_NAME, ConfigManager};
pub use settings::{LoggingSettings, StorageSettings};
