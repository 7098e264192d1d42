use crate::error::BlobError;

/// Metadata for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobMeta {
    pub key: String,
    pub size: u64,
}

/// BlobStore provides storage for uploaded files (packing design artwork,
/// proofs).
///
/// Keys are `/`-separated relative paths: `designs/{id}/{file}`.
/// The default implementation (`FileStore`) maps keys to local filesystem
/// paths; an object-store backend only has to implement this trait.
pub trait BlobStore: Send + Sync {
    /// Store a blob. Overwrites if the key already exists.
    fn put(&self, key: &str, data: &[u8]) -> Result<(), BlobError>;

    /// Retrieve a blob. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;

    /// Delete a blob. No-op if the key does not exist.
    fn delete(&self, key: &str) -> Result<(), BlobError>;

    /// Check whether a blob exists.
    fn exists(&self, key: &str) -> Result<bool, BlobError>;

    /// List blobs whose key starts with `prefix`, sorted by key.
    fn list(&self, prefix: &str) -> Result<Vec<BlobMeta>, BlobError>;

    /// Delete every blob under `prefix`. Returns how many were removed.
    fn delete_prefix(&self, prefix: &str) -> Result<usize, BlobError> {
        let metas = self.list(prefix)?;
        for meta in &metas {
            self.delete(&meta.key)?;
        }
        Ok(metas.len())
    }
}
