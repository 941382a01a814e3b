//! Thin `js_sys::Reflect` bindings to the WebExtension API namespace.
//!
//! Firefox exposes `browser.*` with promise-returning methods; Chromium
//! exposes `chrome.*`, which also returns promises under Manifest V3.
//! Whichever exists is used.

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use lexi_types::{LexiError, Result};

/// The extension API root (`browser`, else `chrome`).
pub fn api_root() -> Result<JsValue> {
    let global = js_sys::global();
    for name in ["browser", "chrome"] {
        let root = Reflect::get(&global, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED);
        if root.is_object() {
            return Ok(root);
        }
    }
    Err(LexiError::JsInterop(
        "WebExtension API not available".to_string(),
    ))
}

/// Walk `path` from the API root, e.g. `["storage", "sync"]`.
pub fn namespace(path: &[&str]) -> Result<JsValue> {
    let mut current = api_root()?;
    for segment in path {
        current = Reflect::get(&current, &JsValue::from_str(segment))
            .map_err(|e| LexiError::JsInterop(describe(&e)))?;
        if !current.is_object() {
            return Err(LexiError::JsInterop(format!(
                "Extension API `{}` not available",
                path.join(".")
            )));
        }
    }
    Ok(current)
}

/// Whether the extension API is reachable from this context.
pub fn is_available() -> bool {
    api_root().is_ok()
}

/// Call `target[method](...args)` synchronously.
pub fn call(target: &JsValue, method: &str, args: &[JsValue]) -> std::result::Result<JsValue, JsValue> {
    let func: Function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into()?;
    let args: Array = args.iter().collect();
    func.apply(target, &args)
}

/// Call a promise-returning method and await it. Plain return values are
/// wrapped, so non-promise methods work too.
pub async fn call_async(
    target: &JsValue,
    method: &str,
    args: &[JsValue],
) -> std::result::Result<JsValue, JsValue> {
    let returned = call(target, method, args)?;
    JsFuture::from(Promise::resolve(&returned)).await
}

/// Register `listener` on an event object such as `runtime.onMessage`.
pub fn add_listener(event_path: &[&str], listener: &JsValue) -> Result<()> {
    let event = namespace(event_path)?;
    call(&event, "addListener", std::slice::from_ref(listener))
        .map(|_| ())
        .map_err(|e| LexiError::JsInterop(describe(&e)))
}

/// Build a plain JS object from key/value pairs.
pub fn object(entries: &[(&str, JsValue)]) -> Result<Object> {
    let obj = Object::new();
    for (key, value) in entries {
        Reflect::set(&obj, &JsValue::from_str(key), value)
            .map_err(|e| LexiError::JsInterop(describe(&e)))?;
    }
    Ok(obj)
}

/// Human-readable text for a thrown JS value.
pub fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    Reflect::get(value, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

/// `runtime.openOptionsPage()`
pub async fn open_options_page() -> Result<()> {
    let runtime = namespace(&["runtime"])?;
    call_async(&runtime, "openOptionsPage", &[])
        .await
        .map(|_| ())
        .map_err(|e| LexiError::JsInterop(describe(&e)))
}

/// Open a page bundled with the extension (e.g. `options.html#history`) in a new tab.
pub async fn open_extension_page(path: &str) -> Result<()> {
    let runtime = namespace(&["runtime"])?;
    let url = call(&runtime, "getURL", &[JsValue::from_str(path)])
        .map_err(|e| LexiError::JsInterop(describe(&e)))?;
    let tabs = namespace(&["tabs"])?;
    let props = object(&[("url", url)])?;
    call_async(&tabs, "create", &[props.into()])
        .await
        .map(|_| ())
        .map_err(|e| LexiError::JsInterop(describe(&e)))
}
