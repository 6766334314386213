//! Platform abstraction layer
//!
//! Browser-only backends. Native builds use `crate::persistence::JsonFileStore`.

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use std::collections::BTreeMap;

    use crate::error::SkyflapError;
    use crate::persistence::KeyValueStore;

    /// Browser LocalStorage, one item per key
    ///
    /// Writes are buffered until `flush`, matching the native file store.
    #[derive(Debug, Default)]
    pub struct LocalStorageStore {
        prefix: String,
        pending: BTreeMap<String, i64>,
    }

    impl LocalStorageStore {
        pub fn new(prefix: &str) -> Self {
            Self {
                prefix: prefix.to_string(),
                pending: BTreeMap::new(),
            }
        }

        fn item_key(&self, key: &str) -> String {
            format!("{}{}", self.prefix, key)
        }

        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }
    }

    impl KeyValueStore for LocalStorageStore {
        fn get(&self, key: &str) -> i64 {
            if let Some(value) = self.pending.get(key) {
                return *value;
            }
            Self::storage()
                .and_then(|s| s.get_item(&self.item_key(key)).ok().flatten())
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        }

        fn set(&mut self, key: &str, value: i64) {
            self.pending.insert(key.to_string(), value);
        }

        fn flush(&mut self) -> Result<(), SkyflapError> {
            let storage = Self::storage()
                .ok_or_else(|| SkyflapError::Storage("LocalStorage not available".into()))?;
            for (key, value) in std::mem::take(&mut self.pending) {
                storage
                    .set_item(&self.item_key(&key), &value.to_string())
                    .map_err(|_| SkyflapError::Storage(format!("failed to write {}", key)))?;
            }
            log::info!("High score saved to LocalStorage");
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
