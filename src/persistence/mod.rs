//! Key-value persistence for the high score
//!
//! Features:
//! - `KeyValueStore` trait: integer values keyed by name, default 0
//! - In-memory store (tests, headless runs)
//! - JSON file store (native)
//!
//! The browser LocalStorage backend lives in `crate::platform`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SkyflapError;

/// A single-integer-per-key persistent store
pub trait KeyValueStore {
    /// Read a value, 0 when the key is absent
    fn get(&self, key: &str) -> i64;
    /// Write a value (visible to `get` immediately, durable after `flush`)
    fn set(&mut self, key: &str, value: i64);
    /// Make pending writes durable
    fn flush(&mut self) -> Result<(), SkyflapError>;
}

/// Volatile store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, i64>,
    /// Number of successful flushes (observable in tests)
    pub flushes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value
    pub fn with_value(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), SkyflapError> {
        self.flushes += 1;
        Ok(())
    }
}

/// JSON object on disk: `{ "HighScore": 12 }`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl JsonFileStore {
    /// Open a store at `path`. A missing file is an empty store; an unreadable
    /// or corrupt one is reported so the caller can decide to start fresh.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SkyflapError> {
        let path = path.as_ref().to_path_buf();
        let values: BTreeMap<String, i64> = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened store {} ({} keys)", path.display(), values.len());
        Ok(Self { path, values })
    }

    /// Open, falling back to an empty store at the same path on error
    pub fn open_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            log::warn!("Store {} unreadable ({}), starting fresh", path.display(), e);
            Self {
                path: path.to_path_buf(),
                values: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sibling of `path` with `.tmp` appended, never equal to `path` itself
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> i64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<(), SkyflapError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        // Write to a temp file then rename so a crash never leaves half a file
        let tmp = temp_path_for(&self.path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
