//! File-backed key-value store.
//!
//! One file per key under a base directory. Keys are percent-encoded into
//! filenames so that arbitrary key strings (emails contain `@`, derived keys
//! contain `:`) stay inside the base directory and two distinct keys can
//! never share a file. Writes go through a temp file and a rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::info;

use super::traits::KeyValueStore;

/// Name of the application folder inside the platform data directory.
const DEFAULT_DIR_NAME: &str = "client-ledger";

/// Encode a key into a filename. Alphanumerics, `-` and `_` pass through,
/// every other byte becomes `%XX`. The mapping is injective, so distinct keys
/// always land in distinct files, and the result never contains a path
/// separator or a `.`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

/// Key-value store persisting each key as a file under a base directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if !base_directory.exists() {
            fs::create_dir_all(&base_directory)?;
            info!("Created data directory: {}", base_directory.display());
        }
        Ok(Self { base_directory })
    }

    /// Create a store in the platform data directory
    /// (e.g. `~/.local/share/client-ledger`).
    pub fn new_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine the user data directory"))?;
        Self::new(data_dir.join(DEFAULT_DIR_NAME))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_directory.join(encode_key(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        // Atomic write: temp file, then rename. Encoded names contain no `.`,
        // so the temp file can never collide with another key's file.
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
