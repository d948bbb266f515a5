//! Insecure file fallback
//!
//! Secrets are kept in plain JSON, readable by anyone with access to the
//! user's files. Used only when no platform store is available and the
//! caller accepted an insecure backend.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{SecretError, SecretResult};

use super::native::{NativeKey, NativeStore};

/// Current file format version
const FORMAT_VERSION: u32 = 1;

/// On-disk document: service (`namespace:type_name`) to key to blob
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

/// Native store persisted to a JSON file
#[derive(Debug)]
pub struct InsecureFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl InsecureFileStore {
    /// Creates a store backed by `path`
    ///
    /// The file and its parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> SecretResult<StoreFile> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(StoreFile {
                    version: FORMAT_VERSION,
                    ..StoreFile::default()
                });
            }
            Err(e) => return Err(self.io_error("read", &e)),
        };

        let file: StoreFile = serde_json::from_str(&content).map_err(|e| {
            SecretError::StoreOperationFailed(format!(
                "Corrupt store file {}: {e}",
                self.path.display()
            ))
        })?;
        if file.version > FORMAT_VERSION {
            return Err(SecretError::StoreOperationFailed(format!(
                "Store file {} has unsupported version {}",
                self.path.display(),
                file.version
            )));
        }
        Ok(file)
    }

    fn write(&self, file: &StoreFile) -> SecretResult<()> {
        let json = serde_json::to_string_pretty(file).map_err(|e| {
            SecretError::StoreOperationFailed(format!("Failed to serialize store file: {e}"))
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", &e))?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let result = write_private(&tmp_path, json.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error("write", &e));
        }
        Ok(())
    }

    fn io_error(&self, action: &str, e: &io::Error) -> SecretError {
        SecretError::StoreOperationFailed(format!(
            "Failed to {action} store file {}: {e}",
            self.path.display()
        ))
    }
}

/// Writes `data` to a fresh file readable only by the owner
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

impl NativeStore for InsecureFileStore {
    fn put(&self, key: &NativeKey, blob: &str) -> SecretResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.read()?;
        file.version = FORMAT_VERSION;
        file.entries
            .entry(key.service())
            .or_default()
            .insert(key.key().to_string(), blob.to_string());
        self.write(&file)
    }

    fn get(&self, key: &NativeKey) -> SecretResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = self.read()?;
        Ok(file
            .entries
            .get(&key.service())
            .and_then(|entries| entries.get(key.key()))
            .cloned())
    }

    fn delete(&self, key: &NativeKey) -> SecretResult<bool> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.read()?;
        let service = key.service();
        let Some(entries) = file.entries.get_mut(&service) else {
            return Ok(false);
        };
        if entries.remove(key.key()).is_none() {
            return Ok(false);
        }
        if entries.is_empty() {
            file.entries.remove(&service);
        }
        self.write(&file)?;
        Ok(true)
    }

    fn is_secure(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "insecure-file"
    }
}
