//! Popup controller: lookup, explain and follow-up from the toolbar popup.
//!
//! Holds the session's conversation (chat id + context) so follow-ups thread
//! through it. Every outcome is published on the `EventBus` for the UI.

use std::cell::RefCell;
use std::rc::Rc;
use lexi_types::{
    LexiError, Result,
    config::Settings,
    event::PopupEvent,
    message::Turn,
    protocol::{Request, Response},
};
use crate::event_bus::EventBus;
use crate::page::MAX_SELECTION_CHARS;
use crate::ports::{RuntimePort, TabPort, TimerPort};
use crate::retry::RetryPolicy;
use crate::settings::SettingsStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupSession {
    pub current_chat_id: Option<String>,
    pub context: Vec<Turn>,
}

pub struct PopupController {
    runtime: Rc<dyn RuntimePort>,
    tabs: Rc<dyn TabPort>,
    timer: Rc<dyn TimerPort>,
    settings: SettingsStore,
    retry: RetryPolicy,
    event_bus: EventBus,
    session: RefCell<PopupSession>,
}

impl PopupController {
    pub fn new(
        runtime: Rc<dyn RuntimePort>,
        tabs: Rc<dyn TabPort>,
        timer: Rc<dyn TimerPort>,
        settings: SettingsStore,
        event_bus: EventBus,
    ) -> Self {
        Self {
            runtime,
            tabs,
            timer,
            settings,
            retry: RetryPolicy::popup(),
            event_bus,
            session: RefCell::new(PopupSession::default()),
        }
    }

    pub fn session(&self) -> PopupSession {
        self.session.borrow().clone()
    }

    /// Fetch the active page's selection to prefill the input.
    /// Failures are swallowed; the field just stays empty.
    pub async fn prefill(&self) -> Option<String> {
        match self.tabs.query_selection().await {
            Ok(reply) if !reply.selection.is_empty() => {
                let text: String = reply.selection.chars().take(MAX_SELECTION_CHARS).collect();
                self.event_bus.emit(PopupEvent::SelectionPrefilled { text: text.clone() });
                Some(text)
            }
            Ok(_) => None,
            Err(e) => {
                log::debug!("No selection from active tab: {}", e);
                None
            }
        }
    }

    /// One-shot liveness check of the background router
    pub async fn ping(&self) -> bool {
        let alive = match self.runtime.send(&Request::Ping).await {
            Ok(resp) => resp.ok,
            Err(e) => {
                log::warn!("Background script not responding: {}", e);
                false
            }
        };
        self.event_bus.emit(PopupEvent::BackgroundStatus { alive });
        alive
    }

    pub async fn lookup(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.pending("Looking up definition...");

        let request = Request::DictLookup {
            text: text.to_string(),
        };
        let event = match self.send(&request).await {
            Ok(resp) if resp.ok => PopupEvent::Definition {
                text: Response::text_or(resp.definition.as_ref(), "No definition found."),
            },
            Ok(resp) => PopupEvent::Failed {
                message: Response::text_or(resp.error.as_ref(), "Lookup failed."),
            },
            Err(e) => PopupEvent::Failed {
                message: format!("Connection error: {}", transport_detail(&e)),
            },
        };
        self.event_bus.emit(event);
    }

    /// Explain `text` as a new conversation and make it the session's conversation.
    pub async fn explain(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.pending("Asking AI to explain...");

        let request = Request::AiExplain {
            text: text.to_string(),
            is_new_conversation: true,
        };
        match self.send(&request).await {
            Ok(resp) if resp.ok => {
                self.event_bus.emit(PopupEvent::Explanation {
                    text: Response::text_or(resp.explanation.as_ref(), "No explanation."),
                });
                {
                    let mut session = self.session.borrow_mut();
                    session.current_chat_id = resp.chat_id.clone();
                    session.context = resp.context.unwrap_or_default();
                }
                self.event_bus.emit(PopupEvent::FollowUpReady {
                    chat_id: resp.chat_id,
                });
            }
            Ok(resp) => self.failed(Response::text_or(resp.error.as_ref(), "AI request failed.")),
            Err(_) => self.failed("Connection error. Please try again.".to_string()),
        }
    }

    pub async fn follow_up(&self, question: &str) {
        let question = question.trim();
        if question.is_empty() {
            return;
        }
        self.pending("Asking follow-up...");

        let session = self.session();
        let request = Request::AiFollowUp {
            question: question.to_string(),
            chat_id: session.current_chat_id,
            context: session.context,
        };
        match self.send(&request).await {
            Ok(resp) if resp.ok => {
                self.event_bus.emit(PopupEvent::Explanation {
                    text: Response::text_or(resp.explanation.as_ref(), "No explanation."),
                });
                if let Some(context) = resp.context {
                    self.session.borrow_mut().context = context;
                }
            }
            Ok(resp) => self.failed(Response::text_or(resp.error.as_ref(), "Follow-up failed.")),
            Err(_) => self.failed("Connection error. Please try again.".to_string()),
        }
    }

    pub async fn load_settings(&self) -> Settings {
        self.settings.load().await.unwrap_or_else(|e| {
            log::warn!("Settings unavailable, using defaults: {}", e);
            Settings::default()
        })
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.settings.update(|s| s.dark_mode = enabled).await.map(|_| ())
    }

    pub async fn set_auto_lookup(&self, enabled: bool) -> Result<()> {
        self.settings.update(|s| s.auto_lookup = enabled).await.map(|_| ())
    }

    async fn send(&self, request: &Request) -> Result<Response> {
        self.retry
            .run(self.timer.as_ref(), |_| self.runtime.send(request))
            .await
    }

    fn pending(&self, status: &str) {
        self.event_bus.emit(PopupEvent::Pending {
            status: status.to_string(),
        });
    }

    fn failed(&self, message: String) {
        self.event_bus.emit(PopupEvent::Failed { message });
    }
}

/// The bare message of a transport failure, without the error-kind prefix.
fn transport_detail(error: &LexiError) -> String {
    match error {
        LexiError::Transport(message) => message.clone(),
        other => other.to_string(),
    }
}
