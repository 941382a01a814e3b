use serde::{Deserialize, Serialize};
use crate::message::Turn;

/// Number of characters of the original text kept in a title
pub const TITLE_CHARS: usize = 50;

/// A persisted explanation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub original_text: String,
    pub title: String,
    pub context: Vec<Turn>,
    /// Milliseconds since the Unix epoch of the last write
    pub timestamp: i64,
}

impl Conversation {
    pub fn new(id: String, original_text: impl Into<String>, context: Vec<Turn>) -> Self {
        let original_text = original_text.into();
        Self {
            id,
            title: make_title(&original_text),
            original_text,
            context,
            timestamp: now_millis(),
        }
    }

    /// Replace the context and refresh the timestamp
    pub fn touch(&mut self, context: Vec<Turn>) {
        self.context = context;
        self.timestamp = now_millis();
    }

    /// First assistant reply, for list previews
    pub fn preview(&self, max_chars: usize) -> Option<String> {
        let reply = self.context.get(1)?;
        let mut preview: String = reply.content.chars().take(max_chars).collect();
        preview.push_str("...");
        Some(preview)
    }
}

/// The first `TITLE_CHARS` characters, ellipsized when the text is longer.
pub fn make_title(text: &str) -> String {
    let mut title: String = text.chars().take(TITLE_CHARS).collect();
    if text.chars().count() > TITLE_CHARS {
        title.push_str("...");
    }
    title
}

/// `chat_<millis>_<9 random hex chars>`. Collisions are unlikely, not impossible.
pub fn generate_chat_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("chat_{}_{}", now_millis(), &random[..9])
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
