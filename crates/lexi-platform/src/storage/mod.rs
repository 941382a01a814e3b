pub mod memory;
pub mod extension;
pub mod auto;

pub use memory::MemoryStorage;
pub use extension::{ExtensionStorage, StorageArea};
pub use auto::{history_storage, open_storage, settings_storage};
