//! Session persistence.
//!
//! The local-storage analog: a state directory holding two fixed keys as JSON
//! files, one for the full document list and one for the theme preference. Both
//! are rewritten on every mutation and read back on startup. A missing or
//! unreadable file restores as empty/default; a viewer should start with a clean
//! shelf rather than refuse to run over a stale cache.

use crate::document::Document;
use std::path::Path;
use std::path::PathBuf;

const DOCUMENTS_KEY: &str = "markdown-files.json";
const DARK_MODE_KEY: &str = "dark-mode.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no usable state directory on this platform")]
    NoStateDir,
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode state: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Opens storage rooted at `dir`, defaulting to the platform data directory
    /// (`…/mdshelf`). Creates the directory if needed.
    pub fn open(dir: Option<PathBuf>) -> Result<Self, StorageError> {
        let dir = match dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .ok_or(StorageError::NoStateDir)?
                .join("mdshelf"),
        };
        std::fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_documents(&self) -> Vec<Document> {
        self.load_key(DOCUMENTS_KEY).unwrap_or_default()
    }

    pub fn save_documents(&self, documents: &[Document]) -> Result<(), StorageError> {
        self.save_key(DOCUMENTS_KEY, &documents)
    }

    pub fn load_dark_mode(&self) -> bool {
        self.load_key(DARK_MODE_KEY).unwrap_or_default()
    }

    pub fn save_dark_mode(&self, dark: bool) -> Result<(), StorageError> {
        self.save_key(DARK_MODE_KEY, &dark)
    }

    fn load_key<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.dir.join(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read state file");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring corrupt state file");
                None
            }
        }
    }

    fn save_key<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(key);
        let json = serde_json::to_vec(value)?;
        std::fs::write(&path, json).map_err(|source| StorageError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(Some(dir.path().join("state"))).unwrap();
        (dir, storage)
    }

    #[test]
    fn documents_round_trip() {
        let (_guard, storage) = open_temp();
        let docs = vec![
            Document::new("a.md", "# A", 5000),
            Document::new("b.md", "p1\n\np2", 3),
        ];
        storage.save_documents(&docs).unwrap();
        assert_eq!(storage.load_documents(), docs);
    }

    #[test]
    fn dark_mode_round_trip() {
        let (_guard, storage) = open_temp();
        assert!(!storage.load_dark_mode());
        storage.save_dark_mode(true).unwrap();
        assert!(storage.load_dark_mode());
    }

    #[test]
    fn missing_state_loads_empty() {
        let (_guard, storage) = open_temp();
        assert!(storage.load_documents().is_empty());
        assert!(!storage.load_dark_mode());
    }

    #[test]
    fn corrupt_state_loads_empty() {
        let (_guard, storage) = open_temp();
        std::fs::write(storage.dir().join("markdown-files.json"), b"{not json").unwrap();
        assert!(storage.load_documents().is_empty());
    }
}
