// Persistence gateway: the only path to the key-value store.
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::DrawError;

/// String-valued key-value store. Reads never fail; a missing or unreadable key is `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), DrawError>;
    fn remove(&self, key: &str) -> Result<(), DrawError>;
}

/// `window.localStorage`.
pub struct BrowserStorage {
    store: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Option<Self> {
        let win = web_sys::window()?;
        let store = win.local_storage().ok().flatten()?;
        Some(Self { store })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.store.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DrawError> {
        self.store
            .set_item(key, value)
            .map_err(|e| DrawError::Storage(format!("write `{key}` failed: {e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), DrawError> {
        self.store
            .remove_item(key)
            .map_err(|e| DrawError::Storage(format!("remove `{key}` failed: {e:?}")))
    }
}

/// Session-only store, used when localStorage is unavailable and in tests.
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DrawError> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DrawError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_removes() {
        let store = MemoryStore::new();
        assert_eq!(store.get("PrizeIndex"), None);
        store.set("PrizeIndex", "3").unwrap();
        assert_eq!(store.get("PrizeIndex").as_deref(), Some("3"));
        store.remove("PrizeIndex").unwrap();
        assert_eq!(store.get("PrizeIndex"), None);
        // removing an absent key is fine
        store.remove("PrizeIndex").unwrap();
    }
}
