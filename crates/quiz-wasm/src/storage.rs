//! `window.localStorage` backend

use quiz_core::{ResultStorage, StorageError, StorageResult};
use wasm_bindgen::{JsCast, JsValue};

/// Browser local storage; every call can throw (quota, privacy mode)
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// The window's local storage, if the browser exposes one
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        match window.local_storage() {
            Ok(Some(inner)) => Some(Self { inner }),
            Ok(None) | Err(_) => None,
        }
    }
}

impl ResultStorage for LocalStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Read(js_error(&e)))
    }

    fn write(&self, key: &str, payload: &str) -> StorageResult<()> {
        self.inner
            .set_item(key, payload)
            .map_err(|e| StorageError::Write(js_error(&e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Write(js_error(&e)))
    }

    fn backend_name(&self) -> &'static str {
        "LocalStorage"
    }
}

/// Best description of a thrown JS value
pub(crate) fn js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
