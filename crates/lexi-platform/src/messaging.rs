//! Runtime and tab messaging.
//!
//! Requests and replies are serialized with serde on both ends, so the
//! tagged `{ type, payload }` shape is the only contract between surfaces.
//! Any failure to get a reply is a `Transport` error, which is what the
//! retry policy keys on.

use std::future::Future;
use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use lexi_core::ports::{RuntimePort, TabPort};
use lexi_types::{
    LexiError, Result,
    protocol::{PageCommand, Request, Response, SelectionReply},
};
use crate::webext::{self, describe};

const NO_REPLY: &str = "No response from background script";

/// Sends requests to the background router via `runtime.sendMessage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeMessenger;

#[async_trait(?Send)]
impl RuntimePort for RuntimeMessenger {
    async fn send(&self, request: &Request) -> Result<Response> {
        let runtime = webext::namespace(&["runtime"])
            .map_err(|e| LexiError::Transport(e.to_string()))?;
        let message = JsValue::from_serde(request)?;

        let reply = webext::call_async(&runtime, "sendMessage", &[message])
            .await
            .map_err(|e| LexiError::Transport(describe(&e)))?;
        if reply.is_undefined() || reply.is_null() {
            return Err(LexiError::Transport(NO_REPLY.to_string()));
        }
        Ok(reply.into_serde::<Response>()?)
    }
}

/// Talks to the content script of the focused tab.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActiveTabMessenger;

impl ActiveTabMessenger {
    /// Id of the active tab in the current window.
    pub async fn active_tab_id() -> Result<i32> {
        let tabs = webext::namespace(&["tabs"]).map_err(|e| LexiError::Transport(e.to_string()))?;
        let query = webext::object(&[
            ("active", JsValue::TRUE),
            ("currentWindow", JsValue::TRUE),
        ])?;
        let found = webext::call_async(&tabs, "query", &[query.into()])
            .await
            .map_err(|e| LexiError::Transport(describe(&e)))?;
        let first = Array::from(&found).get(0);
        tab_id(&first).ok_or_else(|| LexiError::Transport("No active tab".to_string()))
    }
}

#[async_trait(?Send)]
impl TabPort for ActiveTabMessenger {
    async fn query_selection(&self) -> Result<SelectionReply> {
        let id = Self::active_tab_id().await?;
        let reply = send_to_tab(id, &PageCommand::GetSelection).await?;
        if reply.is_undefined() || reply.is_null() {
            return Ok(SelectionReply::default());
        }
        Ok(reply.into_serde::<SelectionReply>()?)
    }
}

/// Deliver `command` to the content script in tab `tab_id`.
pub async fn send_to_tab(tab_id: i32, command: &PageCommand) -> Result<JsValue> {
    let tabs = webext::namespace(&["tabs"]).map_err(|e| LexiError::Transport(e.to_string()))?;
    let message = JsValue::from_serde(command)?;
    webext::call_async(&tabs, "sendMessage", &[JsValue::from(tab_id), message])
        .await
        .map_err(|e| LexiError::Transport(describe(&e)))
}

/// Numeric `id` of a `tabs.Tab`-shaped object.
pub fn tab_id(tab: &JsValue) -> Option<i32> {
    Reflect::get(tab, &JsValue::from_str("id"))
        .ok()
        .and_then(|id| id.as_f64())
        .map(|id| id as i32)
}

/// Register a `runtime.onMessage` listener.
///
/// `handler` gets the raw message and sender. Its output becomes the reply
/// through a returned Promise; `None` resolves to `undefined`.
/// The closure is leaked: listeners live as long as the surface.
pub fn add_message_listener<F, Fut>(handler: F) -> Result<()>
where
    F: Fn(JsValue, JsValue) -> Fut + 'static,
    Fut: Future<Output = Option<JsValue>> + 'static,
{
    let listener = Closure::<dyn FnMut(JsValue, JsValue) -> JsValue>::new(
        move |message: JsValue, sender: JsValue| {
            let reply = handler(message, sender);
            JsValue::from(future_to_promise(async move {
                Ok(reply.await.unwrap_or(JsValue::UNDEFINED))
            }))
        },
    );
    webext::add_listener(&["runtime", "onMessage"], listener.as_ref())?;
    listener.forget();
    Ok(())
}

/// Serialize a value for handing back to JS, logging instead of failing.
pub fn to_js<T: serde::Serialize>(value: &T) -> Option<JsValue> {
    match JsValue::from_serde(value) {
        Ok(js) => Some(js),
        Err(e) => {
            log::warn!("Reply not serializable: {}", e);
            None
        }
    }
}
