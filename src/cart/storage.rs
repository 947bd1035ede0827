use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StorageError;

/// Fixed key the cart record lives under.
pub const CART_STORAGE_KEY: &str = "bokku-cart";

/// Durable home of the serialized cart: one record under one key.
pub trait CartStorage: Send + Debug {
    /// The stored record, or `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replaces the stored record.
    fn write(&mut self, contents: &str) -> Result<(), StorageError>;
}

/// Keeps the cart record in `<data_dir>/bokku-cart.json`.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{CART_STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for FileCartStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory record. Clones share the same slot, so a test can keep one
/// handle and inspect what the ledger wrote through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or(None)
    }
}

impl CartStorage for MemoryCartStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents())
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(contents.to_string());
        }
        Ok(())
    }
}
