pub mod fs;
pub mod memory;

use crate::error::RolError;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

/// Artifact store the pipeline stages hand files through.
///
/// Keys are relative, `/`-separated paths such as `extracted/document_1.pdf`.
/// Every stage reads and writes through this trait, so the hand-off from
/// acquisition to processing is visible in the signatures and tests can run
/// against [`MemoryStorage`].
pub trait Storage: Send + Sync {
    /// Create or overwrite the artifact at `key`, creating parent
    /// directories as needed.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), RolError>;

    /// Read the artifact at `key`. Missing artifacts yield
    /// [`RolError::ArtifactMissing`].
    fn get(&self, key: &str) -> Result<Vec<u8>, RolError>;

    fn exists(&self, key: &str) -> bool;

    /// Names of the direct children of `dir` (files and directories), sorted
    /// lexicographically. An empty `dir` lists the root; a missing directory
    /// lists as empty.
    fn list(&self, dir: &str) -> Result<Vec<String>, RolError>;

    fn remove(&self, key: &str) -> Result<(), RolError>;

    /// Move `from` to `to`, replacing `to` if present.
    fn rename(&self, from: &str, to: &str) -> Result<(), RolError>;

    /// Human-readable location of `key`, e.g. `downloads/rol_procedimentos.zip`.
    fn location(&self, key: &str) -> String;

    /// First entry of `dir` (in [`Storage::list`] order) accepted by `pred`.
    fn find_first(
        &self,
        dir: &str,
        pred: &dyn Fn(&str) -> bool,
    ) -> Result<Option<String>, RolError> {
        Ok(self.list(dir)?.into_iter().find(|name| pred(name)))
    }
}

/// The two storage roles of the processing stage.
#[derive(Clone, Copy)]
pub struct Stores<'a> {
    /// Download root: archives, annexes, extracted directory, output archive.
    pub downloads: &'a dyn Storage,
    /// Work area holding the intermediate CSV.
    pub work: &'a dyn Storage,
}

/// Join a directory key and an entry name.
pub fn join_key(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

/// Reject keys that could leave the storage root.
pub fn validate_key(key: &str) -> Result<(), RolError> {
    let invalid = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.contains(':')
        || key.split('/').any(|part| part.is_empty() || part == "..");
    if invalid {
        return Err(RolError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "a.zip"), "a.zip");
        assert_eq!(join_key("extracted", "a.pdf"), "extracted/a.pdf");
        assert_eq!(join_key("extracted/", "a.pdf"), "extracted/a.pdf");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("rol_procedimentos.zip").is_ok());
        assert!(validate_key("extracted/document_1.pdf").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("extracted/../../x").is_err());
        assert!(validate_key("/abs").is_err());
        assert!(validate_key("a\\b").is_err());
        assert!(validate_key("C:x").is_err());
        assert!(validate_key("a//b").is_err());
    }
}
