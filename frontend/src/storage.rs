//! `sessionStorage` backend for the record store.

use common::store::{SessionStorage, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Browser session storage. When the browser refuses access (private mode,
/// sandboxed iframe) the backend is detached: reads find nothing and writes
/// are discarded, so uploads simply do not survive a reload.
pub struct BrowserSessionStorage {
    storage: Option<Storage>,
}

impl BrowserSessionStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.session_storage().ok().flatten());
        if storage.is_none() {
            gloo_console::warn!("sessionStorage unavailable, uploads will not survive a reload");
        }
        Self { storage }
    }

    pub fn detached() -> Self {
        Self { storage: None }
    }
}

impl Default for BrowserSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn js_error(err: JsValue) -> StorageError {
    StorageError(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

impl SessionStorage for BrowserSessionStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.storage {
            Some(storage) => storage.get_item(key).map_err(js_error),
            None => Ok(None),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match &self.storage {
            Some(storage) => storage.set_item(key, value).map_err(js_error),
            None => Ok(()),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match &self.storage {
            Some(storage) => storage.remove_item(key).map_err(js_error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_storage_reads_nothing_and_accepts_writes() {
        let mut storage = BrowserSessionStorage::detached();
        assert_eq!(storage.save("session", "{}"), Ok(()));
        assert_eq!(storage.load("session"), Ok(None));
        assert_eq!(storage.remove("session"), Ok(()));
    }
}
