//! Content script: watches selections and drives the in-page tooltip.

use std::rc::{Rc, Weak};

use gloo_utils::format::JsValueSerdeExt;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use lexi_core::page::PageController;
use lexi_core::ports::{PageView, TimerPort};
use lexi_core::settings::SettingsStore;
use lexi_platform::messaging::{add_message_listener, to_js, RuntimeMessenger};
use lexi_platform::overlay::{current_selection, is_overlay_event, DomOverlay, OverlayActions};
use lexi_platform::storage::settings_storage;
use lexi_platform::timer::GlooTimer;
use lexi_platform::webext::describe;
use lexi_types::protocol::PageCommand;
use lexi_types::{LexiError, Result};

/// Lets the browser finish updating the selection after mouse-up.
const SELECTION_SETTLE_MS: u64 = 50;

pub fn start() -> Result<()> {
    let overlay = Rc::new(DomOverlay::new()?);
    let view: Rc<dyn PageView> = overlay.clone();
    let controller = Rc::new(PageController::new(
        Rc::new(RuntimeMessenger),
        Rc::new(GlooTimer),
        SettingsStore::new(settings_storage()),
        view,
    ));
    overlay.set_actions(overlay_actions(Rc::downgrade(&controller)));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| LexiError::JsInterop("No document".to_string()))?;

    let on_mouse_up = {
        let controller = controller.clone();
        Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |event: web_sys::MouseEvent| {
            if is_overlay_event(&event) {
                return;
            }
            let (x, y) = (f64::from(event.client_x()), f64::from(event.client_y()));
            let controller = controller.clone();
            spawn_local(async move {
                GlooTimer.sleep(SELECTION_SETTLE_MS).await;
                controller.on_selection(&current_selection(), x, y).await;
            });
        })
    };
    document
        .add_event_listener_with_callback("mouseup", on_mouse_up.as_ref().unchecked_ref())
        .map_err(|e| LexiError::JsInterop(describe(&e)))?;
    on_mouse_up.forget();

    let on_selection_change = {
        let controller = controller.clone();
        Closure::<dyn FnMut()>::new(move || {
            let controller = controller.clone();
            spawn_local(async move {
                controller.on_selection_change(&current_selection()).await;
            });
        })
    };
    document
        .add_event_listener_with_callback(
            "selectionchange",
            on_selection_change.as_ref().unchecked_ref(),
        )
        .map_err(|e| LexiError::JsInterop(describe(&e)))?;
    on_selection_change.forget();

    add_message_listener(move |message, _sender| {
        let controller = controller.clone();
        async move {
            let command = match message.into_serde::<PageCommand>() {
                Ok(command) => command,
                Err(e) => {
                    log::debug!("Ignoring message: {}", e);
                    return None;
                }
            };
            controller
                .handle_command(command)
                .and_then(|reply| to_js(&reply))
        }
    })?;

    log::info!("Selection watcher ready");
    Ok(())
}

/// Tooltip button callbacks. The controller owns the overlay that owns
/// these, so they hold the controller weakly.
fn overlay_actions(controller: Weak<PageController>) -> OverlayActions {
    let on_close = {
        let controller = controller.clone();
        Rc::new(move || {
            if let Some(controller) = controller.upgrade() {
                controller.close();
            }
        })
    };
    let on_explain = Rc::new(move || {
        if let Some(controller) = controller.upgrade() {
            spawn_local(async move {
                controller.explain().await;
            });
        }
    });
    OverlayActions {
        on_close,
        on_explain,
    }
}
