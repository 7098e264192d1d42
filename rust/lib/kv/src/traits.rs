use crate::error::KVError;

/// KVStore provides a flat key-value interface.
///
/// Keys follow a namespaced, `/`-separated convention such as
/// `seen/{user_id}/{section}`, so `scan` by prefix selects one namespace.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Set several pairs in one transaction.
    fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    /// Get a value as a UTF-8 string.
    fn get_string(&self, key: &str) -> Result<Option<String>, KVError> {
        match self.get(key)? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| KVError::Encoding { key: key.to_string() }),
            None => Ok(None),
        }
    }
}
