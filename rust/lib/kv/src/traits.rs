use crate::error::KVError;

/// Read-modify-write step for [`KVStore::update`].
///
/// Receives the current value (None if the key is absent) and returns the
/// value to write, or None to leave the key untouched. An error aborts the
/// update without writing.
pub type UpdateFn<'a> = Box<dyn FnOnce(Option<&[u8]>) -> Result<Option<Vec<u8>>, KVError> + 'a>;

/// KVStore is the document store every module persists into.
///
/// Keys follow a namespaced convention: `student:{id}`. Values are opaque
/// bytes; modules store serialized JSON documents.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Insert or overwrite a key-value pair.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Read and rewrite one key atomically. No other write to the store can
    /// land between the read and the write. Returns the value written.
    fn update(&self, key: &str, apply: UpdateFn<'_>) -> Result<Option<Vec<u8>>, KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns (key, value) pairs sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
