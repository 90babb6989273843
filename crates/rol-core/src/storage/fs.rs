use crate::error::RolError;
use crate::storage::{validate_key, Storage};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Storage rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStorage { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, RolError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn resolve_dir(&self, dir: &str) -> Result<PathBuf, RolError> {
        if dir.is_empty() {
            Ok(self.root.clone())
        } else {
            self.resolve(dir)
        }
    }
}

fn missing_as(key: &str, e: std::io::Error) -> RolError {
    if e.kind() == ErrorKind::NotFound {
        RolError::ArtifactMissing(key.to_string())
    } else {
        RolError::Io(e)
    }
}

impl Storage for FsStorage {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), RolError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, RolError> {
        let path = self.resolve(key)?;
        std::fs::read(&path).map_err(|e| missing_as(key, e))
    }

    fn exists(&self, key: &str) -> bool {
        self.resolve(key).map(|p| p.is_file()).unwrap_or(false)
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, RolError> {
        let path = self.resolve_dir(dir)?;
        let entries = match std::fs::read_dir(&path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RolError::Io(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => {
                    tracing::warn!(dir, name = ?raw, "skipping entry with non-UTF-8 name");
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove(&self, key: &str) -> Result<(), RolError> {
        let path = self.resolve(key)?;
        std::fs::remove_file(&path).map_err(|e| missing_as(key, e))
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), RolError> {
        let src = self.resolve(from)?;
        let dst = self.resolve(to)?;
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(&src, &dst).map_err(|e| missing_as(from, e))
    }

    fn location(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path().join("downloads"));

        storage.put("extracted/document_1.pdf", b"%PDF").unwrap();

        assert!(storage.exists("extracted/document_1.pdf"));
        assert_eq!(storage.get("extracted/document_1.pdf").unwrap(), b"%PDF");
        assert_eq!(storage.list("").unwrap(), vec!["extracted"]);
    }

    #[test]
    fn test_list_is_sorted_and_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        assert!(storage.list("nothing-here").unwrap().is_empty());

        storage.put("b.zip", b"b").unwrap();
        storage.put("a.zip", b"a").unwrap();
        storage.put("C.zip", b"c").unwrap();
        assert_eq!(storage.list("").unwrap(), vec!["C.zip", "a.zip", "b.zip"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_list_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        storage.put("rol_procedimentos.zip", b"z").unwrap();
        std::fs::write(dir.path().join(OsStr::from_bytes(b"rol_\xff.zip")), b"x").unwrap();

        let names = storage.list("").unwrap();
        assert_eq!(names, vec!["rol_procedimentos.zip"]);
        for name in &names {
            assert!(storage.get(name).is_ok());
        }
    }

    #[test]
    fn test_get_missing_is_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let err = storage.get("dados_rol.csv").unwrap_err();
        assert!(matches!(err, RolError::ArtifactMissing(ref k) if k == "dados_rol.csv"));
    }

    #[test]
    fn test_rename_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        storage.put("out.zip", b"old").unwrap();
        storage.put("out.zip.partial", b"new").unwrap();

        storage.rename("out.zip.partial", "out.zip").unwrap();

        assert_eq!(storage.get("out.zip").unwrap(), b"new");
        assert!(!storage.exists("out.zip.partial"));
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        assert!(matches!(
            storage.put("../escape.txt", b"x"),
            Err(RolError::InvalidKey(_))
        ));
        assert!(!storage.exists("../escape.txt"));
    }

    #[test]
    fn test_location_joins_root() {
        let storage = FsStorage::new("downloads");
        assert_eq!(
            storage.location("Teste_seu_nome.zip"),
            std::path::Path::new("downloads")
                .join("Teste_seu_nome.zip")
                .display()
                .to_string()
        );
    }
}
