//! Lexi: WASM entry points.
//!
//! This crate is the composition root. Each extension surface loads the
//! same module and calls its own `start_*` export, which assembles the
//! platform adapters and hands them to the core controllers.

mod background;
mod content;
mod options;
mod popup;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

fn init_logging(surface: &str) {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Lexi {} starting...", surface);
}

fn js_error(e: lexi_types::LexiError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Background service worker: message router and context menu.
#[wasm_bindgen]
pub fn start_background() -> Result<(), JsValue> {
    init_logging("background");
    background::start().map_err(js_error)
}

/// Content script: selection watcher and in-page tooltip.
#[wasm_bindgen]
pub fn start_content() -> Result<(), JsValue> {
    init_logging("content script");
    content::start().map_err(js_error)
}

/// Toolbar popup, rendered with egui into `canvas_id`.
#[wasm_bindgen]
pub async fn start_popup(canvas_id: String) -> Result<(), JsValue> {
    init_logging("popup");
    let canvas = find_canvas(&canvas_id)?;
    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(popup::PopupApp::new(cc)))),
        )
        .await
}

/// Options page, rendered with egui into `canvas_id`.
#[wasm_bindgen]
pub async fn start_options(canvas_id: String) -> Result<(), JsValue> {
    init_logging("options page");
    let canvas = find_canvas(&canvas_id)?;
    eframe::WebRunner::new()
        .start(
            canvas,
            eframe::WebOptions::default(),
            Box::new(|cc| Ok(Box::new(options::OptionsApp::new(cc)))),
        )
        .await
}

fn find_canvas(canvas_id: &str) -> Result<web_sys::HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("No canvas element with id '{}'", canvas_id)))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("Element is not a canvas"))
}
