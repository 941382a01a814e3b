//! Wire messages exchanged between the background process, content scripts,
//! and the popup. All router replies share the `{ ok, ... }` envelope.

use serde::{Deserialize, Serialize};
use crate::message::Turn;

pub const UNKNOWN_MESSAGE_TYPE: &str = "Unknown message type";
pub const PONG_MESSAGE: &str = "Background script is running";

/// Requests accepted by the background router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Request {
    #[serde(rename = "PING")]
    Ping,
    #[serde(rename = "DICT_LOOKUP")]
    DictLookup { text: String },
    #[serde(rename = "AI_EXPLAIN")]
    AiExplain {
        text: String,
        #[serde(rename = "isNewConversation", default)]
        is_new_conversation: bool,
    },
    #[serde(rename = "AI_FOLLOWUP")]
    AiFollowUp {
        question: String,
        #[serde(rename = "chatId", default)]
        chat_id: Option<String>,
        #[serde(default)]
        context: Vec<Turn>,
    },
}

impl Request {
    pub const KNOWN_TYPES: &'static [&'static str] =
        &["PING", "DICT_LOOKUP", "AI_EXPLAIN", "AI_FOLLOWUP"];

    pub fn type_name(&self) -> &'static str {
        match self {
            Request::Ping => "PING",
            Request::DictLookup { .. } => "DICT_LOOKUP",
            Request::AiExplain { .. } => "AI_EXPLAIN",
            Request::AiFollowUp { .. } => "AI_FOLLOWUP",
        }
    }
}

/// Reply envelope. `ok` is always present; the other fields depend on the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<Turn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn pong() -> Self {
        Self {
            ok: true,
            message: Some(PONG_MESSAGE.to_string()),
            ..Default::default()
        }
    }

    pub fn definition(definition: impl Into<String>) -> Self {
        Self {
            ok: true,
            definition: Some(definition.into()),
            ..Default::default()
        }
    }

    pub fn explanation(
        explanation: impl Into<String>,
        chat_id: Option<String>,
        context: Option<Vec<Turn>>,
    ) -> Self {
        Self {
            ok: true,
            explanation: Some(explanation.into()),
            chat_id,
            context,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Non-empty `field`, or `fallback`
    pub fn text_or(field: Option<&String>, fallback: &str) -> String {
        match field {
            Some(s) if !s.is_empty() => s.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Commands sent to a page's content script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum PageCommand {
    #[serde(rename = "SHOW_TOOLTIP")]
    ShowTooltip { text: String },
    #[serde(rename = "HIDE_TOOLTIP")]
    HideTooltip,
    #[serde(rename = "GET_SELECTION")]
    GetSelection,
}

/// Reply to `GET_SELECTION`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionReply {
    #[serde(default)]
    pub selection: String,
}
