use serde::{Deserialize, Serialize};

/// Events published by the popup controller.
/// The popup UI drains these each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PopupEvent {
    /// A request is in flight; the text replaces the result area
    Pending { status: String },

    /// Plain-text dictionary result
    Definition { text: String },

    /// Markdown explanation text
    Explanation { text: String },

    /// A failure string replacing the result area
    Failed { message: String },

    /// A conversation exists and follow-ups can be sent
    FollowUpReady { chat_id: Option<String> },

    /// Selection fetched from the active page on open
    SelectionPrefilled { text: String },

    /// Result of the background liveness check
    BackgroundStatus { alive: bool },
}
