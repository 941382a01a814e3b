//! WASM-target tests for lexi-platform (Node.js runtime).
//!
//! Tests MemoryStorage, the storage fallback and the messaging error paths
//! under wasm32-unknown-unknown via `wasm-pack test --node`. Node has no
//! WebExtension API, so everything that needs one must fail cleanly.
//!
//! Overlay tests require a DOM and are not run here.

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use lexi_core::ports::{RuntimePort, StoragePort, TabPort, TimerPort};
use lexi_core::settings::SettingsStore;
use lexi_platform::messaging::{tab_id, ActiveTabMessenger, RuntimeMessenger};
use lexi_platform::storage::{open_storage, ExtensionStorage, MemoryStorage, StorageArea};
use lexi_platform::timer::GlooTimer;
use lexi_platform::webext;
use lexi_types::protocol::Request;
use lexi_types::LexiError;
use serde_json::json;
use std::rc::Rc;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
    assert!(storage.is_empty());
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    assert!(storage.get("nonexistent").await.unwrap().is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_set_and_get() {
    let storage = MemoryStorage::new();
    storage.set("settings", json!({ "darkMode": false })).await.unwrap();
    let value = storage.get("settings").await.unwrap();
    assert_eq!(value, Some(json!({ "darkMode": false })));
    assert_eq!(storage.len(), 1);
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", json!(1)).await.unwrap();
    storage.set("key", json!(2)).await.unwrap();
    assert_eq!(storage.get("key").await.unwrap(), Some(json!(2)));
}

#[wasm_bindgen_test]
async fn memory_storage_backs_settings_store() {
    let settings = SettingsStore::new(Rc::new(MemoryStorage::new()));
    assert!(settings.install_defaults().await.unwrap());
    let loaded = settings.load().await.unwrap();
    assert!(loaded.auto_lookup);
    assert!(loaded.dark_mode);
    assert_eq!(loaded.model, "gemini-2.5-flash");
}

// ─── Extension API Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn webext_unavailable_under_node() {
    assert!(!webext::is_available());
    assert!(matches!(webext::namespace(&["runtime"]), Err(LexiError::JsInterop(_))));
}

#[wasm_bindgen_test]
fn extension_storage_requires_api() {
    assert!(ExtensionStorage::open(StorageArea::Sync).is_err());
    assert_eq!(StorageArea::Local.as_str(), "local");
}

#[wasm_bindgen_test]
fn open_storage_falls_back_to_memory() {
    let storage = open_storage(StorageArea::Local);
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn runtime_messenger_reports_transport_error() {
    let err = RuntimeMessenger.send(&Request::Ping).await.unwrap_err();
    assert!(err.is_transport());
}

#[wasm_bindgen_test]
async fn tab_messenger_reports_transport_error() {
    let err = ActiveTabMessenger.query_selection().await.unwrap_err();
    assert!(err.is_transport());
}

#[wasm_bindgen_test]
fn tab_id_reads_numeric_id() {
    let tab = webext::object(&[("id", JsValue::from(42))]).unwrap();
    assert_eq!(tab_id(&tab.into()), Some(42));
    assert_eq!(tab_id(&JsValue::UNDEFINED), None);
}

#[wasm_bindgen_test]
fn describe_js_errors() {
    assert_eq!(webext::describe(&JsValue::from_str("boom")), "boom");
    let err: JsValue = js_sys::Error::new("Receiving end does not exist").into();
    assert_eq!(webext::describe(&err), "Receiving end does not exist");
}

// ─── Timer Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
async fn gloo_timer_sleeps() {
    GlooTimer.sleep(1).await;
}
