//! Volatile in-memory storage used by tests and ephemeral sessions.

use super::{KeyValueStorage, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory key/value map. Single-threaded, like the UI it stands in for.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStorage;
    use crate::storage::KeyValueStorage;

    #[test]
    fn set_replaces_and_remove_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.set_item("userType", "student").unwrap();
        storage.set_item("userType", "teacher").unwrap();
        assert_eq!(
            storage.get_item("userType").unwrap().as_deref(),
            Some("teacher")
        );

        storage.remove_item("userType").unwrap();
        storage.remove_item("userType").unwrap();
        assert!(storage.is_empty());
    }
}
