//! WASM-target tests for lexi-core.
//!
//! Runs the router, chat history, page controller and popup controller
//! end to end against in-memory ports under wasm32-unknown-unknown via
//! `wasm-pack test --node`.

use wasm_bindgen_test::*;

use lexi_core::dictionary::DictionaryClient;
use lexi_core::event_bus::EventBus;
use lexi_core::gemini::{GeminiClient, MISSING_API_KEY};
use lexi_core::history::ChatHistoryStore;
use lexi_core::page::{OverlayContent, OverlayState, PageController, Anchor};
use lexi_core::popup::PopupController;
use lexi_core::ports::*;
use lexi_core::router::Router;
use lexi_core::settings::SettingsStore;
use lexi_types::config::Settings;
use lexi_types::event::PopupEvent;
use lexi_types::protocol::*;
use lexi_types::LexiError;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

// ─── Mock Ports ──────────────────────────────────────────

struct MockHttp {
    responses: RefCell<VecDeque<(u16, Value)>>,
    urls: RefCell<Vec<String>>,
}

impl MockHttp {
    fn with(responses: Vec<(u16, Value)>) -> Rc<Self> {
        Rc::new(Self {
            responses: RefCell::new(responses.into()),
            urls: RefCell::new(Vec::new()),
        })
    }

    fn next(&self, url: &str) -> lexi_types::Result<HttpResponse> {
        self.urls.borrow_mut().push(url.to_string());
        let (status, body) = self
            .responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| LexiError::Network("unexpected request".to_string()))?;
        Ok(HttpResponse { status, body: body.to_string() })
    }
}

#[async_trait(?Send)]
impl HttpPort for MockHttp {
    async fn get(&self, url: &str) -> lexi_types::Result<HttpResponse> {
        self.next(url)
    }

    async fn post_json(&self, url: &str, _body: &Value) -> lexi_types::Result<HttpResponse> {
        self.next(url)
    }
}

struct MemStorage {
    data: RefCell<HashMap<String, Value>>,
}

impl MemStorage {
    fn new() -> Rc<Self> {
        Rc::new(Self { data: RefCell::new(HashMap::new()) })
    }
}

#[async_trait(?Send)]
impl StoragePort for MemStorage {
    async fn get(&self, key: &str) -> lexi_types::Result<Option<Value>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> lexi_types::Result<()> {
        self.data.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "wasm-test"
    }
}

struct NoSleep;

#[async_trait(?Send)]
impl TimerPort for NoSleep {
    async fn sleep(&self, _ms: u64) {}
}

/// Serializes requests and hands them to a router, like the extension runtime
struct Loopback {
    router: Router,
}

#[async_trait(?Send)]
impl RuntimePort for Loopback {
    async fn send(&self, request: &Request) -> lexi_types::Result<Response> {
        let reply = self.router.dispatch(&serde_json::to_value(request)?).await;
        Ok(reply)
    }
}

struct Disconnected {
    attempts: RefCell<u32>,
}

#[async_trait(?Send)]
impl RuntimePort for Disconnected {
    async fn send(&self, _request: &Request) -> lexi_types::Result<Response> {
        *self.attempts.borrow_mut() += 1;
        Err(LexiError::Transport("Could not establish connection".to_string()))
    }
}

struct NullView {
    states: RefCell<Vec<OverlayState>>,
}

impl PageView for NullView {
    fn render(&self, state: &OverlayState, _anchor: Anchor) {
        self.states.borrow_mut().push(state.clone());
    }

    fn set_explain_busy(&self, _busy: bool) {}

    fn clear_page_selection(&self) {}

    fn current_selection(&self) -> String {
        String::new()
    }
}

struct NoTab;

#[async_trait(?Send)]
impl TabPort for NoTab {
    async fn query_selection(&self) -> lexi_types::Result<SelectionReply> {
        Err(LexiError::Transport("no content script".to_string()))
    }
}

async fn router_with(http: Rc<MockHttp>, storage: Rc<MemStorage>, api_key: &str) -> Router {
    let settings = SettingsStore::new(storage.clone());
    settings
        .save(&Settings { api_key: api_key.to_string(), ..Settings::default() })
        .await
        .unwrap();
    Router::new(
        DictionaryClient::new(http.clone()),
        GeminiClient::new(http, settings, ChatHistoryStore::new(storage)),
    )
}

fn gemini_reply(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

// ─── Router Tests ────────────────────────────────────────

#[wasm_bindgen_test]
async fn router_answers_ping() {
    let router = router_with(MockHttp::with(vec![]), MemStorage::new(), "").await;
    let reply = router.dispatch(&json!({ "type": "PING" })).await;
    assert!(reply.ok);
    assert_eq!(reply.message.as_deref(), Some(PONG_MESSAGE));
}

#[wasm_bindgen_test]
async fn router_rejects_unknown_type() {
    let router = router_with(MockHttp::with(vec![]), MemStorage::new(), "").await;
    let reply = router.dispatch(&json!({ "type": "NOPE", "payload": {} })).await;
    assert_eq!(reply, Response::failure(UNKNOWN_MESSAGE_TYPE));
}

#[wasm_bindgen_test]
async fn router_explain_requires_key() {
    let http = MockHttp::with(vec![]);
    let router = router_with(http.clone(), MemStorage::new(), "  ").await;
    let reply = router
        .dispatch(&json!({ "type": "AI_EXPLAIN", "payload": { "text": "x" } }))
        .await;
    assert_eq!(reply.error.as_deref(), Some(MISSING_API_KEY));
    assert!(http.urls.borrow().is_empty());
}

#[wasm_bindgen_test]
async fn router_persists_new_conversation() {
    let storage = MemStorage::new();
    let http = MockHttp::with(vec![(200, gemini_reply("An answer."))]);
    let router = router_with(http, storage.clone(), "key").await;

    let reply = router
        .dispatch(&json!({
            "type": "AI_EXPLAIN",
            "payload": { "text": "quasar", "isNewConversation": true }
        }))
        .await;
    assert!(reply.ok);

    let history = ChatHistoryStore::new(storage).list().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(Some(history[0].id.clone()), reply.chat_id);
    assert!(history[0].id.starts_with("chat_"));
}

// ─── Page Controller Tests ───────────────────────────────

#[wasm_bindgen_test]
async fn page_lookup_through_router() {
    let http = MockHttp::with(vec![(200, json!([{ "word": "tree", "meanings": [] }]))]);
    let storage = MemStorage::new();
    let router = router_with(http, storage.clone(), "").await;
    let view = Rc::new(NullView { states: RefCell::new(Vec::new()) });
    let page = PageController::new(
        Rc::new(Loopback { router }),
        Rc::new(NoSleep),
        SettingsStore::new(storage),
        view.clone(),
    );

    page.on_selection("tree", 5.0, 5.0).await;
    assert_eq!(
        *view.states.borrow(),
        vec![
            OverlayState::Loading,
            OverlayState::Populated(OverlayContent::Plain("• tree".to_string())),
        ]
    );
}

#[wasm_bindgen_test]
async fn page_gives_up_after_three_attempts() {
    let runtime = Rc::new(Disconnected { attempts: RefCell::new(0) });
    let view = Rc::new(NullView { states: RefCell::new(Vec::new()) });
    let page = PageController::new(
        runtime.clone(),
        Rc::new(NoSleep),
        SettingsStore::new(MemStorage::new()),
        view,
    );

    page.on_selection("tree", 0.0, 0.0).await;
    assert_eq!(*runtime.attempts.borrow(), 3);
    assert_eq!(
        page.overlay_state(),
        OverlayState::Populated(OverlayContent::Plain(
            "Connection error. Try again later.".to_string()
        ))
    );
}

// ─── Popup Controller Tests ──────────────────────────────

#[wasm_bindgen_test]
async fn popup_threads_follow_up() {
    let storage = MemStorage::new();
    let http = MockHttp::with(vec![
        (200, gemini_reply("One.")),
        (200, gemini_reply("Two.")),
    ]);
    let router = router_with(http, storage.clone(), "key").await;
    let bus = EventBus::new();
    let popup = PopupController::new(
        Rc::new(Loopback { router }),
        Rc::new(NoTab),
        Rc::new(NoSleep),
        SettingsStore::new(storage.clone()),
        bus.clone(),
    );

    assert!(popup.prefill().await.is_none());
    popup.explain("tides").await;
    popup.follow_up("why twice a day?").await;

    let events = bus.drain();
    assert_eq!(
        events.last(),
        Some(&PopupEvent::Explanation { text: "Two.".to_string() })
    );
    let history = ChatHistoryStore::new(storage).list().await.unwrap();
    assert_eq!(history[0].context.len(), 4);
    assert_eq!(popup.session().context, history[0].context);
}

#[wasm_bindgen_test]
async fn popup_reports_dead_background() {
    let bus = EventBus::new();
    let popup = PopupController::new(
        Rc::new(Disconnected { attempts: RefCell::new(0) }),
        Rc::new(NoTab),
        Rc::new(NoSleep),
        SettingsStore::new(MemStorage::new()),
        bus.clone(),
    );
    assert!(!popup.ping().await);
    assert_eq!(bus.drain(), vec![PopupEvent::BackgroundStatus { alive: false }]);
}
