use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexiError {
    /// Missing or unusable configuration; the message is shown to the user as-is.
    #[error("{0}")]
    Config(String),

    #[error("Dictionary API error (HTTP {status})")]
    Dictionary { status: u16 },

    #[error("Gemini API error: {status} - {message}")]
    RemoteApi { status: u16, message: String },

    /// Messaging between extension surfaces failed
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl LexiError {
    /// Transport failures are the only retried kind.
    pub fn is_transport(&self) -> bool {
        matches!(self, LexiError::Transport(_))
    }
}

impl From<serde_json::Error> for LexiError {
    fn from(e: serde_json::Error) -> Self {
        LexiError::Serialization(e.to_string())
    }
}
