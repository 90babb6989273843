use crate::error::RolError;
use crate::storage::{validate_key, Storage};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

/// In-memory storage. Directories exist implicitly as key prefixes.
#[derive(Debug)]
pub struct MemoryStorage {
    label: String,
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// `label` plays the role of the root directory in [`Storage::location`].
    pub fn new(label: impl Into<String>) -> Self {
        MemoryStorage {
            label: label.into(),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// All keys currently stored, in order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("mem")
    }
}

impl Storage for MemoryStorage {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), RolError> {
        validate_key(key)?;
        self.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, RolError> {
        validate_key(key)?;
        self.lock()
            .get(key)
            .cloned()
            .ok_or_else(|| RolError::ArtifactMissing(key.to_string()))
    }

    fn exists(&self, key: &str) -> bool {
        validate_key(key).is_ok() && self.lock().contains_key(key)
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, RolError> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            validate_key(dir)?;
            format!("{}/", dir.trim_end_matches('/'))
        };

        let children: BTreeSet<String> = self
            .lock()
            .keys()
            .filter_map(|key| key.strip_prefix(prefix.as_str()))
            .filter_map(|rest| rest.split('/').next())
            .map(str::to_string)
            .collect();
        Ok(children.into_iter().collect())
    }

    fn remove(&self, key: &str) -> Result<(), RolError> {
        validate_key(key)?;
        self.lock()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| RolError::ArtifactMissing(key.to_string()))
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), RolError> {
        validate_key(from)?;
        validate_key(to)?;
        let mut entries = self.lock();
        let bytes = entries
            .remove(from)
            .ok_or_else(|| RolError::ArtifactMissing(from.to_string()))?;
        entries.insert(to.to_string(), bytes);
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("{}/{}", self.label, key)
    }
}
