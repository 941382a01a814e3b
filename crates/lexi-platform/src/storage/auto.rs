//! Pick the best available backend for a storage area.
//!
//! Priority: extension storage → memory (fallback)

use std::rc::Rc;
use lexi_core::ports::StoragePort;
use super::{ExtensionStorage, MemoryStorage, StorageArea};

/// Open `area`, or fall back to memory when the extension API is missing.
/// Returns a trait object so callers are backend-agnostic.
pub fn open_storage(area: StorageArea) -> Rc<dyn StoragePort> {
    match ExtensionStorage::open(area) {
        Ok(storage) => {
            log::info!("Storage backend: {}", storage.backend_name());
            Rc::new(storage)
        }
        Err(e) => {
            log::warn!(
                "storage.{} unavailable ({}), falling back to memory",
                area.as_str(),
                e
            );
            Rc::new(MemoryStorage::new())
        }
    }
}

/// Synced area: settings
pub fn settings_storage() -> Rc<dyn StoragePort> {
    open_storage(StorageArea::Sync)
}

/// Local area: chat history
pub fn history_storage() -> Rc<dyn StoragePort> {
    open_storage(StorageArea::Local)
}
