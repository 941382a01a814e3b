//! Page interaction layer: the content script's overlay state machine.
//!
//! `Hidden → Loading → Populated` and back to `Hidden`. DOM concerns stay
//! behind `PageView`; this module decides what the overlay shows and when.
//! In-flight lookups are never cancelled: two racing lookups both land,
//! last one wins.

use std::cell::RefCell;
use std::rc::Rc;
use lexi_types::protocol::{PageCommand, Request, Response, SelectionReply};
use crate::markdown::{self, Block};
use crate::ports::{PageView, RuntimePort, TimerPort};
use crate::retry::RetryPolicy;
use crate::settings::SettingsStore;

/// Selections this long or longer are ignored
pub const MAX_SELECTION_CHARS: usize = 200;
/// Offset from the pointer to the overlay's top-left corner
pub const POINTER_OFFSET: f64 = 10.0;
/// Where pushed tooltips (context menu) appear
pub const FIXED_ANCHOR: Anchor = Anchor { x: 20.0, y: 20.0 };

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayContent {
    Plain(String),
    Markdown(Vec<Block>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayState {
    Hidden,
    Loading,
    Populated(OverlayContent),
}

impl OverlayState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, OverlayState::Hidden)
    }
}

/// Viewport position of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn near_pointer(x: f64, y: f64) -> Self {
        Self {
            x: x + POINTER_OFFSET,
            y: y + POINTER_OFFSET,
        }
    }
}

struct PageState {
    overlay: OverlayState,
    anchor: Anchor,
    last_selection: String,
}

pub struct PageController {
    runtime: Rc<dyn RuntimePort>,
    timer: Rc<dyn TimerPort>,
    settings: SettingsStore,
    view: Rc<dyn PageView>,
    retry: RetryPolicy,
    state: RefCell<PageState>,
}

impl PageController {
    pub fn new(
        runtime: Rc<dyn RuntimePort>,
        timer: Rc<dyn TimerPort>,
        settings: SettingsStore,
        view: Rc<dyn PageView>,
    ) -> Self {
        Self {
            runtime,
            timer,
            settings,
            view,
            retry: RetryPolicy::content_script(),
            state: RefCell::new(PageState {
                overlay: OverlayState::Hidden,
                anchor: FIXED_ANCHOR,
                last_selection: String::new(),
            }),
        }
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.state.borrow().overlay.clone()
    }

    pub fn last_selection(&self) -> String {
        self.state.borrow().last_selection.clone()
    }

    /// Selection finished (mouse-up) at viewport position `(x, y)`.
    pub async fn on_selection(&self, selection: &str, x: f64, y: f64) {
        if !self.auto_lookup_enabled().await {
            return;
        }
        let text = selection.trim();
        if text.is_empty() {
            self.hide();
            return;
        }
        if text.chars().count() >= MAX_SELECTION_CHARS {
            return;
        }
        self.lookup(text, Anchor::near_pointer(x, y)).await;
    }

    /// `selectionchange`: an emptied selection hides the overlay.
    pub async fn on_selection_change(&self, selection: &str) {
        if selection.trim().is_empty() && self.auto_lookup_enabled().await {
            self.hide();
        }
    }

    /// Capture `text` and replace the overlay with its definition.
    pub async fn lookup(&self, text: &str, anchor: Anchor) {
        {
            let mut state = self.state.borrow_mut();
            state.last_selection = text.to_string();
            state.anchor = anchor;
        }
        self.transition(OverlayState::Loading);

        let request = Request::DictLookup {
            text: text.to_string(),
        };
        let content = match self.send(&request).await {
            Ok(resp) if resp.ok => Response::text_or(resp.definition.as_ref(), "No definition."),
            Ok(resp) => Response::text_or(resp.error.as_ref(), "Lookup failed."),
            Err(e) => {
                log::warn!("Dictionary lookup undeliverable: {}", e);
                "Connection error. Try again later.".to_string()
            }
        };
        self.transition(OverlayState::Populated(OverlayContent::Plain(content)));
    }

    /// The overlay's "Explain with AI" button: explain the captured selection.
    pub async fn explain(&self) {
        let text = self.last_selection();
        if text.is_empty() {
            return;
        }
        self.view.set_explain_busy(true);

        let request = Request::AiExplain {
            text,
            is_new_conversation: false,
        };
        let content = match self.send(&request).await {
            Ok(resp) if resp.ok => match resp.explanation.as_deref() {
                Some(explanation) if !explanation.is_empty() => {
                    OverlayContent::Markdown(markdown::render(explanation))
                }
                _ => OverlayContent::Plain("No explanation available.".to_string()),
            },
            Ok(resp) => OverlayContent::Plain(Response::text_or(resp.error.as_ref(), "AI failed.")),
            Err(e) => {
                log::warn!("Explain request undeliverable: {}", e);
                OverlayContent::Plain("Connection error. Please try again.".to_string())
            }
        };
        self.view.set_explain_busy(false);
        if !self.overlay_state().is_visible() {
            log::debug!("Tooltip closed while explaining, result dropped");
            return;
        }
        self.transition(OverlayState::Populated(content));
    }

    /// Close button: hide and drop the page selection so it does not re-trigger.
    pub fn close(&self) {
        self.hide();
        self.view.clear_page_selection();
    }

    pub fn hide(&self) {
        if self.state.borrow().overlay.is_visible() {
            self.transition(OverlayState::Hidden);
        }
    }

    /// Show pre-supplied markdown text without a lookup.
    pub fn show_text(&self, text: &str) {
        self.state.borrow_mut().anchor = FIXED_ANCHOR;
        self.transition(OverlayState::Populated(OverlayContent::Markdown(
            markdown::render(text),
        )));
    }

    /// Commands from the background or popup. Only `GET_SELECTION` has a reply.
    pub fn handle_command(&self, command: PageCommand) -> Option<SelectionReply> {
        match command {
            PageCommand::ShowTooltip { text } => {
                if !text.is_empty() {
                    self.show_text(&text);
                }
                None
            }
            PageCommand::HideTooltip => {
                self.hide();
                None
            }
            PageCommand::GetSelection => Some(SelectionReply {
                selection: self.view.current_selection().trim().to_string(),
            }),
        }
    }

    async fn send(&self, request: &Request) -> lexi_types::Result<Response> {
        self.retry
            .run(self.timer.as_ref(), |_| self.runtime.send(request))
            .await
    }

    async fn auto_lookup_enabled(&self) -> bool {
        match self.settings.load().await {
            Ok(settings) => settings.auto_lookup,
            Err(e) => {
                log::warn!("Settings unavailable: {}", e);
                false
            }
        }
    }

    fn transition(&self, next: OverlayState) {
        let anchor = {
            let mut state = self.state.borrow_mut();
            state.overlay = next.clone();
            state.anchor
        };
        self.view.render(&next, anchor);
    }
}
