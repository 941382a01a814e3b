//! Background surface: owns the router and the "Explain with AI" context menu.
//!
//! Every listener is registered synchronously during `start`, so a service
//! worker woken by an event finds its handlers in place.

use std::rc::Rc;

use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Array, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use lexi_core::dictionary::DictionaryClient;
use lexi_core::gemini::GeminiClient;
use lexi_core::history::ChatHistoryStore;
use lexi_core::ports::HttpPort;
use lexi_core::router::Router;
use lexi_core::settings::SettingsStore;
use lexi_platform::http::FetchHttp;
use lexi_platform::messaging::{add_message_listener, send_to_tab, tab_id, to_js};
use lexi_platform::storage::{history_storage, settings_storage};
use lexi_platform::webext::{self, describe};
use lexi_types::protocol::{PageCommand, Response, UNKNOWN_MESSAGE_TYPE};
use lexi_types::Result;

pub const MENU_ID: &str = "aiExplainSelection";
const MENU_TITLE: &str = "Explain with AI";

pub fn start() -> Result<()> {
    let http: Rc<dyn HttpPort> = Rc::new(FetchHttp::new());
    let settings = SettingsStore::new(settings_storage());
    let history = ChatHistoryStore::new(history_storage());
    let router = Rc::new(Router::new(
        DictionaryClient::new(http.clone()),
        GeminiClient::new(http, settings.clone(), history),
    ));

    let handler_router = router.clone();
    add_message_listener(move |message, _sender| {
        let router = handler_router.clone();
        async move {
            let reply = match message.into_serde::<Value>() {
                Ok(value) => router.dispatch(&value).await,
                Err(e) => {
                    log::warn!("Undecodable message: {}", e);
                    Response::failure(UNKNOWN_MESSAGE_TYPE)
                }
            };
            to_js(&reply)
        }
    })?;

    let on_installed = Closure::<dyn FnMut(JsValue)>::new(move |_details: JsValue| {
        let settings = settings.clone();
        spawn_local(async move {
            match settings.install_defaults().await {
                Ok(true) => log::info!("Default settings installed"),
                Ok(false) => {}
                Err(e) => log::error!("Failed to install default settings: {}", e),
            }
            if let Err(e) = create_context_menu() {
                log::warn!("Context menu unavailable: {}", e);
            }
        });
    });
    webext::add_listener(&["runtime", "onInstalled"], on_installed.as_ref())?;
    on_installed.forget();

    let on_clicked = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |info: JsValue, tab: JsValue| {
        let router = router.clone();
        spawn_local(async move {
            explain_from_menu(&router, info, tab).await;
        });
    });
    match webext::add_listener(&["contextMenus", "onClicked"], on_clicked.as_ref()) {
        Ok(()) => on_clicked.forget(),
        Err(e) => log::warn!("Context menu clicks not available: {}", e),
    }

    log::info!("Background router ready");
    Ok(())
}

fn create_context_menu() -> Result<()> {
    let menus = webext::namespace(&["contextMenus"])?;
    let contexts: Array = std::iter::once(JsValue::from_str("selection")).collect();
    let props = webext::object(&[
        ("id", JsValue::from_str(MENU_ID)),
        ("title", JsValue::from_str(MENU_TITLE)),
        ("contexts", contexts.into()),
    ])?;
    webext::call(&menus, "create", &[props.into()])
        .map(|_| ())
        .map_err(|e| lexi_types::LexiError::JsInterop(describe(&e)))
}

/// Explain the clicked selection and show the outcome in that tab's tooltip.
async fn explain_from_menu(router: &Router, info: JsValue, tab: JsValue) {
    let field = |name: &str| {
        Reflect::get(&info, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_string())
    };
    if field("menuItemId").as_deref() != Some(MENU_ID) {
        return;
    }
    let Some(selection) = field("selectionText").filter(|s| !s.trim().is_empty()) else {
        return;
    };
    let Some(id) = tab_id(&tab) else {
        log::warn!("Context menu click without a tab");
        return;
    };

    let text = match router.gemini().explain(&selection, false).await {
        Ok(result) => result.explanation,
        Err(e) => format!("Error: {}", e),
    };
    if let Err(e) = send_to_tab(id, &PageCommand::ShowTooltip { text }).await {
        log::warn!("Could not reach tab {}: {}", id, e);
    }
}
