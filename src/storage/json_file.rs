//! JSON-backed storage area.
//!
//! `JsonFileStorageArea` persists all items as a single JSON object on disk:
//!
//! ```json
//! { "analysisResults": "{\"headers\":{...},...}" }
//! ```
//!
//! ### I/O characteristics & caveats
//! - Every operation reads the file again, so two processes sharing a path
//!   see each other's writes. Mutations **read then rewrite** the whole file.
//! - A missing, unreadable or malformed file reads as an empty area. It is
//!   replaced on the next write.
//! - File writes are not atomic.
use crate::storage::area::StorageArea;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Items = BTreeMap<String, String>;

pub struct JsonFileStorageArea {
    /// Path to the JSON file holding the items.
    path: PathBuf,

    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStorageArea {
    /// Opens the area at `path`. The file is only created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Items {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("cannot read storage file {}: {}", self.path.display(), e);
                }
                return Items::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("storage file {} is not a JSON object of strings: {}", self.path.display(), e);
            Items::new()
        })
    }

    fn save(&self, items: &Items) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("cannot write storage file {}", self.path.display()))
    }

    fn update(&self, f: impl FnOnce(&mut Items)) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut items = self.load();
        f(&mut items);
        self.save(&items)
    }
}

impl StorageArea for JsonFileStorageArea {
    fn get_item(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|items| {
            items.remove(key);
        })
    }

    fn len(&self) -> usize {
        self.load().len()
    }
}
