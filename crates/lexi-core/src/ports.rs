//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `lexi-core` (pure Rust).
//! Implementations live in `lexi-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use serde_json::Value;
use lexi_types::{
    Result,
    protocol::{Request, Response, SelectionReply},
};

// ─── HTTP Port ───────────────────────────────────────────────

/// Status and raw body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body parsed as JSON, or `None` when it is not JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

#[async_trait(?Send)]
pub trait HttpPort {
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse>;
}

// ─── Storage Port ────────────────────────────────────────────

/// A key/value area holding JSON values (extension `storage.local` / `storage.sync`).
#[async_trait(?Send)]
pub trait StoragePort {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Messaging Ports ─────────────────────────────────────────

/// Delivers a request to the background router and waits for its reply.
/// Channel failures surface as `LexiError::Transport`.
#[async_trait(?Send)]
pub trait RuntimePort {
    async fn send(&self, request: &Request) -> Result<Response>;
}

/// Asks the content script of the active tab for its selection.
#[async_trait(?Send)]
pub trait TabPort {
    async fn query_selection(&self) -> Result<SelectionReply>;
}

// ─── Timer Port ──────────────────────────────────────────────

#[async_trait(?Send)]
pub trait TimerPort {
    async fn sleep(&self, ms: u64);
}

// ─── Page View Port ──────────────────────────────────────────

/// The on-page overlay as seen by the page controller.
pub trait PageView {
    fn render(&self, state: &crate::page::OverlayState, anchor: crate::page::Anchor);

    /// Explain button busy indicator
    fn set_explain_busy(&self, busy: bool);

    /// Drop the page's text selection so it does not re-trigger a lookup
    fn clear_page_selection(&self);

    /// Current page selection, untrimmed
    fn current_selection(&self) -> String;
}
