//! Directory-backed key/value storage
//!
//! The desktop counterpart of browser local storage: every key is a small
//! file inside one directory. Linux default location:
//! ~/.local/share/greta/storage

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{storage_error, Result};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Opens (creating if needed) storage rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens storage in the platform data directory
    pub fn open_default() -> Result<Self> {
        let dir = directories::ProjectDirs::from("com", "greta", "greta")
            .ok_or_else(|| storage_error("Could not determine data directory for your platform"))?
            .data_dir()
            .join("storage");
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::write(&path, value)?;
        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Removes a key; returns whether anything was there
    pub fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        debug!("Removed {}", key);
        Ok(true)
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(storage_error(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path()).unwrap();

        assert_eq!(storage.get("greeting").unwrap(), None);
        storage.set("greeting", "hello").unwrap();
        assert_eq!(storage.get("greeting").unwrap().as_deref(), Some("hello"));

        assert!(storage.remove("greeting").unwrap());
        assert!(!storage.remove("greeting").unwrap());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp.path()).unwrap();

        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("").is_err());
    }
}
