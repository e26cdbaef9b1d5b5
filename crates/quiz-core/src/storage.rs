//! Key-value persistence capability
//!
//! The result store never checks whether storage "exists"; it is handed a
//! [`ResultStorage`] and treats every failure as best-effort:
//! - [`MemoryStorage`]: in-process map, can be flipped to unavailable for tests
//! - [`NullStorage`]: no backing store at all
//!
//! Front-ends add their own backends (a JSON file, `window.localStorage`).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors a storage backend can report
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached at all
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Reading the payload failed
    #[error("storage read failed: {0}")]
    Read(String),
    /// Writing the payload failed (quota, permissions, ...)
    #[error("storage write failed: {0}")]
    Write(String),
    /// The collection could not be encoded
    #[error("could not encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A string-keyed store of UTF-8 payloads
pub trait ResultStorage {
    /// Read the payload under `key`; `Ok(None)` when nothing is stored
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the payload under `key`
    fn write(&self, key: &str, payload: &str) -> StorageResult<()>;

    /// Remove the payload under `key`
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Backend name for status display and logs
    fn backend_name(&self) -> &'static str;
}

impl<S: ResultStorage + ?Sized> ResultStorage for &S {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, payload: &str) -> StorageResult<()> {
        (**self).write(key, payload)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

impl<S: ResultStorage + ?Sized> ResultStorage for Box<S> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, payload: &str) -> StorageResult<()> {
        (**self).write(key, payload)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

// ==================== In-memory Backend ====================

/// In-memory storage, mainly for tests
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
    available: Mutex<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            available: Mutex::new(true),
        }
    }

    /// Storage pre-filled with `payload` under `key`
    pub fn with_payload(key: &str, payload: &str) -> Self {
        let storage = Self::new();
        lock(&storage.data).insert(key.to_string(), payload.to_string());
        storage
    }

    /// Make every operation fail as if the store were unreachable
    pub fn set_available(&self, available: bool) {
        *lock(&self.available) = available;
    }

    /// Raw payload under `key`, bypassing availability
    pub fn payload(&self, key: &str) -> Option<String> {
        lock(&self.data).get(key).cloned()
    }

    fn check_available(&self) -> StorageResult<()> {
        if *lock(&self.available) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory storage switched off".into()))
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStorage for MemoryStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.check_available()?;
        Ok(lock(&self.data).get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> StorageResult<()> {
        self.check_available()?;
        lock(&self.data).insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.check_available()?;
        lock(&self.data).remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Memory"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ==================== Null Backend ====================

/// Stand-in for an absent store: nothing to read, every write refused
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

impl ResultStorage for NullStorage {
    fn read(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _payload: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("no storage backend".into()))
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "None"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("k").unwrap(), None);

        storage.write("k", "[]").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("[]"));

        storage.remove("k").unwrap();
        assert_eq!(storage.read("k").unwrap(), None);
    }

    #[test]
    fn test_memory_unavailable() {
        let storage = MemoryStorage::with_payload("k", "[]");
        storage.set_available(false);

        assert!(matches!(storage.read("k"), Err(StorageError::Unavailable(_))));
        assert!(storage.write("k", "x").is_err());
        assert_eq!(storage.payload("k").as_deref(), Some("[]"));
    }

    #[test]
    fn test_null_storage() {
        let storage = NullStorage;
        assert_eq!(storage.read("k").unwrap(), None);
        assert!(storage.write("k", "[]").is_err());
        assert_eq!(storage.backend_name(), "None");
    }

    #[test]
    fn test_boxed_backend() {
        let storage: Box<dyn ResultStorage> = Box::new(MemoryStorage::new());
        storage.write("k", "v").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.backend_name(), "Memory");
    }

    #[test]
    fn test_encode_error_conversion() {
        let err = serde_json::from_str::<u8>("x").unwrap_err();
        let err = StorageError::from(err);
        assert!(matches!(err, StorageError::Encode(_)));
        assert!(err.to_string().starts_with("could not encode results"));
    }
}
