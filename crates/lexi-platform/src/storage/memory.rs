//! In-memory storage backend.
//! Used when no extension storage area is reachable (tests, plain pages).
//! Nothing survives a reload.

use std::cell::RefCell;
use std::collections::HashMap;
use async_trait::async_trait;
use serde_json::Value;
use lexi_core::ports::StoragePort;
use lexi_types::Result;

#[derive(Default)]
pub struct MemoryStorage {
    data: RefCell<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }
}

#[async_trait(?Send)]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.data.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
