use crate::domain::error::{AppError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key-value store holding one serialized credential record per platform key.
pub trait CredentialBackend {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per platform under a data directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CredentialBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Writes a sibling temp file and renames it over the record.
    fn write(&self, key: &str, value: &str) -> Result<()> {
        ensure_dir(&self.dir)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            AppError::IoError(format!("Failed to replace {}: {}", path.display(), e))
        })
    }
}

/// Process-local store; nothing survives the process.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl CredentialBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("Credential memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("Credential memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested"));

        assert_eq!(backend.read("jira").unwrap(), None);
        backend.write("jira", r#"{"server":"s"}"#).unwrap();
        assert_eq!(backend.read("jira").unwrap().as_deref(), Some(r#"{"server":"s"}"#));
        assert!(dir.path().join("nested").join("jira.json").exists());
        assert!(!dir.path().join("nested").join(".jira.json.tmp").exists());
    }

    #[test]
    fn test_file_backend_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.write("github", "{}").unwrap();
        backend.write("github", r#"{"repo":"r"}"#).unwrap();
        assert_eq!(backend.read("github").unwrap().as_deref(), Some(r#"{"repo":"r"}"#));
    }

    #[test]
    fn test_memory_backend_keys_are_independent() {
        let backend = MemoryBackend::with_entries([("jira", "{}")]);
        backend.write("gitlab", "{}").unwrap();
        assert!(backend.read("jira").unwrap().is_some());
        assert!(backend.read("gitlab").unwrap().is_some());
        assert!(backend.read("polarion").unwrap().is_none());
    }
}
