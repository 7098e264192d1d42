use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BlobError;
use crate::traits::{BlobMeta, BlobStore};

fn io(e: std::io::Error) -> BlobError {
    BlobError::Io(e.to_string())
}

/// FileStore is a BlobStore implementation backed by the local filesystem.
///
/// Keys are mapped to paths under `base_dir`:
///   key "designs/ab12/front.pdf" → `{base_dir}/designs/ab12/front.pdf`
///
/// Parent directories are created automatically on `put`.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_dir`.
    /// The directory is created if it doesn't exist.
    pub fn open(base_dir: &Path) -> Result<Self, BlobError> {
        fs::create_dir_all(base_dir).map_err(io)?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Resolve a key to a filesystem path.
    ///
    /// Every `/`-separated component must be a plain name: no empty parts,
    /// no `.`/`..`, no backslashes or drive separators. That keeps every
    /// resolved path under `base_dir` without touching the filesystem.
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        if key.is_empty() {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        let mut path = self.base_dir.clone();
        for part in key.split('/') {
            let bad = part.is_empty()
                || part == "."
                || part == ".."
                || part.contains('\\')
                || part.contains(':')
                || part.contains('\0');
            if bad {
                return Err(BlobError::InvalidKey(key.to_string()));
            }
            path.push(part);
        }
        Ok(path)
    }

    /// Recursively walk a directory, collecting blobs whose keys match prefix.
    fn walk_dir(&self, dir: &Path, prefix: &str, results: &mut Vec<BlobMeta>) -> Result<(), BlobError> {
        if !dir.is_dir() {
            return Ok(());
        }

        for entry in fs::read_dir(dir).map_err(io)? {
            let entry = entry.map_err(io)?;
            let path = entry.path();

            if path.is_dir() {
                self.walk_dir(&path, prefix, results)?;
            } else if path.is_file() {
                let Ok(rel) = path.strip_prefix(&self.base_dir) else {
                    continue;
                };
                let key = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.starts_with(prefix) {
                    let size = entry.metadata().map_err(io)?.len();
                    results.push(BlobMeta { key, size });
                }
            }
        }

        Ok(())
    }
}

impl BlobStore for FileStore {
    fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io)?;
        }
        fs::write(&path, data).map_err(io)?;
        debug!(key, size = data.len(), "stored blob");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let path = self.resolve(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        fs::read(&path).map(Some).map_err(io)
    }

    fn delete(&self, key: &str) -> Result<(), BlobError> {
        let path = self.resolve(key)?;
        if path.is_file() {
            fs::remove_file(&path).map_err(io)?;
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, BlobError> {
        Ok(self.resolve(key)?.is_file())
    }

    fn list(&self, prefix: &str) -> Result<Vec<BlobMeta>, BlobError> {
        let mut results = Vec::new();
        self.walk_dir(&self.base_dir, prefix, &mut results)?;
        results.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(results)
    }
}
