//! Storage slots
//!
//! A storage slot is a single key-value cell holding the serialized account
//! directory. Every save overwrites the whole value, so two processes sharing a
//! slot are last-writer-wins.

use crate::types::BankError;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key of the slot holding the account directory
pub const DEFAULT_SLOT_KEY: &str = "banco_entrega2_cuentas";

/// Key-value storage holding one string per key
pub trait StorageSlot {
    /// Read the value under `key`, `None` if the slot is empty
    fn read(&self, key: &str) -> Result<Option<String>, BankError>;

    /// Overwrite the value under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<(), BankError>;

    /// Remove the value under `key`; clearing an empty slot succeeds
    fn clear(&mut self, key: &str) -> Result<(), BankError>;
}

/// In-memory slot, private to one session
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, BankError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BankError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), BankError> {
        self.values.remove(key);
        Ok(())
    }
}

/// File-backed slot: each key is stored as `<root>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileSlot {
    root: PathBuf,
}

impl FileSlot {
    /// Create a slot rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSlot { root: root.into() }
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StorageSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, BankError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), BankError> {
        fs::create_dir_all(&self.root)?;

        // Staged write then rename: readers only ever see a complete value
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), BankError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
