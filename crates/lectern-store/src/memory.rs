//! In-memory store, for tests and for running without a data directory

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{Store, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let values = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.values.read().is_ok()
    }
}
