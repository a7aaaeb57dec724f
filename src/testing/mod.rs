use std::collections::HashMap;
use std::sync::Mutex;

use crate::tenant::TenantStore;

/// In-memory key-value store standing in for browser storage in unit tests
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TenantStore for MemoryStore {
    fn set_item(&self, key: &str, value: Option<&str>) {
        self.items
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.map(str::to_string));
    }

    fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .expect("store lock poisoned")
            .get(key)
            .cloned()
            .flatten()
    }
}
