//! Storage backends for the terminal front-end
//!
//! Picked from the environment:
//! - Local: one JSON file per key under the platform data directory
//! - Test: in-memory, nothing survives the process

use quiz_core::{MemoryStorage, ResultStorage, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// File-based storage
    Local,
    /// In-memory storage
    Test,
}

impl Environment {
    /// Detect environment from the QUIZIFY_ENV variable
    pub fn detect() -> Self {
        Self::from_value(std::env::var("QUIZIFY_ENV").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("test") | Some("testing") => Environment::Test,
            _ => Environment::Local,
        }
    }
}

/// Create the backend for `env`, storing files under `data_dir` if given
pub fn create_backend(env: Environment, data_dir: Option<PathBuf>) -> Box<dyn ResultStorage> {
    match env {
        Environment::Local => {
            Box::new(FileStorage::new(data_dir.unwrap_or_else(FileStorage::default_dir)))
        }
        Environment::Test => Box::new(MemoryStorage::new()),
    }
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<local data dir>/quizify`, or `./quizify` when there is none
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizify")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ResultStorage for FileStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    fn write(&self, key: &str, payload: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write(e.to_string()))?;

        // Write aside and rename so readers never see half a payload
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(|e| StorageError::Write(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::Write(e.to_string()))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write(e.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "File"
    }
}
