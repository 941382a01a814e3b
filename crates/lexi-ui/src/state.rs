//! UI-level state that drives rendering.
//! The popup state is a projection of the popup controller's outcomes,
//! updated each frame by draining the EventBus.

use lexi_core::markdown::{self, Block};
use lexi_types::config::Settings;
use lexi_types::conversation::Conversation;
use lexi_types::event::PopupEvent;
use lexi_types::message::Role;

/// What the popup's result area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Empty,
    /// In-flight status line
    Status(String),
    Plain(String),
    Markdown(Vec<Block>),
    Error(String),
}

/// State visible to the popup panel
pub struct PopupUiState {
    /// Lookup/explain input
    pub input_text: String,
    pub follow_up_text: String,
    pub result: ResultView,
    pub busy: bool,
    /// A conversation exists, so the follow-up button is shown
    pub follow_up_enabled: bool,
    /// The follow-up input row is open
    pub show_follow_up: bool,
    /// `None` until the liveness check answers
    pub background_alive: Option<bool>,
    pub dark_mode: bool,
    pub auto_lookup: bool,
}

impl PopupUiState {
    pub fn new() -> Self {
        let defaults = Settings::default();
        Self {
            input_text: String::new(),
            follow_up_text: String::new(),
            result: ResultView::Empty,
            busy: false,
            follow_up_enabled: false,
            show_follow_up: false,
            background_alive: None,
            dark_mode: defaults.dark_mode,
            auto_lookup: defaults.auto_lookup,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<PopupEvent>) {
        for event in events {
            match event {
                PopupEvent::Pending { status } => {
                    self.result = ResultView::Status(status);
                    self.busy = true;
                }
                PopupEvent::Definition { text } => {
                    self.result = ResultView::Plain(text);
                    self.busy = false;
                }
                PopupEvent::Explanation { text } => {
                    self.result = ResultView::Markdown(markdown::render(&text));
                    self.busy = false;
                }
                PopupEvent::Failed { message } => {
                    self.result = ResultView::Error(message);
                    self.busy = false;
                }
                PopupEvent::FollowUpReady { .. } => {
                    self.follow_up_enabled = true;
                }
                PopupEvent::SelectionPrefilled { text } => {
                    if self.input_text.is_empty() {
                        self.input_text = text;
                    }
                }
                PopupEvent::BackgroundStatus { alive } => {
                    self.background_alive = Some(alive);
                }
            }
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.dark_mode = settings.dark_mode;
        self.auto_lookup = settings.auto_lookup;
    }

    /// Take the follow-up question and close the follow-up row
    pub fn take_follow_up(&mut self) -> Option<String> {
        let question = self.follow_up_text.trim().to_string();
        if question.is_empty() {
            return None;
        }
        self.follow_up_text.clear();
        self.show_follow_up = false;
        Some(question)
    }

    pub fn cancel_follow_up(&mut self) {
        self.follow_up_text.clear();
        self.show_follow_up = false;
    }
}

impl Default for PopupUiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Save feedback passed in from the app layer
#[derive(Debug, Clone, PartialEq)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

impl SaveFeedback {
    pub fn saved() -> Self {
        Self {
            message: "Saved ✅".to_string(),
            success: true,
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Save failed: {}", error),
            success: false,
        }
    }
}

/// State of the options page (settings form + chat history)
pub struct OptionsUiState {
    pub settings: Settings,
    pub save_feedback: Option<SaveFeedback>,
    pub history: Vec<Conversation>,
    /// Id of the conversation shown expanded; at most one
    pub expanded: Option<String>,
    /// The clear-history confirmation is showing
    pub confirm_clear: bool,
}

impl OptionsUiState {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            save_feedback: None,
            history: Vec::new(),
            expanded: None,
            confirm_clear: false,
        }
    }

    /// Expand `id`, collapsing any other; expanding it again collapses it.
    pub fn toggle_expanded(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn set_history(&mut self, history: Vec<Conversation>) {
        if let Some(id) = &self.expanded {
            if !history.iter().any(|c| &c.id == id) {
                self.expanded = None;
            }
        }
        self.history = history;
    }

    pub fn history_count_label(&self) -> String {
        history_count_label(self.history.len())
    }
}

impl Default for OptionsUiState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn history_count_label(count: usize) -> String {
    format!("{} conversation{}", count, if count == 1 { "" } else { "s" })
}

/// Local date/time for an epoch-millisecond timestamp
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|utc| {
            utc.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_default()
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You:",
        Role::Assistant => "AI:",
    }
}
