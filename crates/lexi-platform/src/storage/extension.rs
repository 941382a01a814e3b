//! WebExtension storage areas (`storage.local`, `storage.sync`).
//!
//! Values cross the boundary as JSON via gloo-utils' serde bridge, so
//! whatever the core stores comes back structurally identical.

use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::Reflect;
use serde_json::Value;
use wasm_bindgen::JsValue;

use lexi_core::ports::StoragePort;
use lexi_types::{LexiError, Result};
use crate::webext::{self, describe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    /// Per-device, larger quota
    Local,
    /// Follows the user's browser profile
    Sync,
}

impl StorageArea {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageArea::Local => "local",
            StorageArea::Sync => "sync",
        }
    }
}

pub struct ExtensionStorage {
    area: StorageArea,
    handle: JsValue,
    name: String,
}

impl ExtensionStorage {
    /// Bind to `storage.<area>`. Fails outside an extension context.
    pub fn open(area: StorageArea) -> Result<Self> {
        let handle = webext::namespace(&["storage", area.as_str()])?;
        Ok(Self {
            area,
            handle,
            name: format!("extension-{}", area.as_str()),
        })
    }

    pub fn area(&self) -> StorageArea {
        self.area
    }

    async fn call(&self, method: &str, arg: JsValue) -> Result<JsValue> {
        webext::call_async(&self.handle, method, &[arg])
            .await
            .map_err(|e| LexiError::Storage(format!("storage.{}.{}: {}", self.area.as_str(), method, describe(&e))))
    }
}

#[async_trait(?Send)]
impl StoragePort for ExtensionStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let items = self.call("get", JsValue::from_str(key)).await?;
        let value = Reflect::get(&items, &JsValue::from_str(key))
            .map_err(|e| LexiError::Storage(describe(&e)))?;
        if value.is_undefined() {
            return Ok(None);
        }
        Ok(Some(value.into_serde::<Value>()?))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let items = webext::object(&[(key, JsValue::from_serde(&value)?)])?;
        self.call("set", items.into()).await?;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}
