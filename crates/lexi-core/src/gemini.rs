//! Gemini `generateContent` client.
//!
//! Explanations started as a new conversation are written to the chat
//! history here, so every conversation in history came through this client.

use std::rc::Rc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use lexi_types::{
    LexiError, Result,
    conversation::{generate_chat_id, Conversation},
    message::Turn,
};
use crate::history::ChatHistoryStore;
use crate::ports::HttpPort;
use crate::settings::SettingsStore;

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const MISSING_API_KEY: &str = "Add your Gemini API key in Options.";
pub const NO_EXPLANATION: &str = "No explanation available.";

const EXPLAIN_INSTRUCTION: &str =
    "Explain the following in simple, beginner-friendly terms. Keep it under 120 words:";
const FOLLOW_UP_INSTRUCTION: &str =
    "Please answer the follow-up question based on our previous conversation. Keep it under 120 words.";

/// Sampling parameters sent with every request. Not user-configurable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    max_output_tokens: 200,
    top_p: 0.8,
    top_k: 40,
};

/// Result of `explain`. `chat_id` and `context` are set only for new conversations.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub explanation: String,
    pub chat_id: Option<String>,
    pub context: Option<Vec<Turn>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FollowUp {
    pub explanation: String,
    pub context: Vec<Turn>,
}

pub struct GeminiClient {
    http: Rc<dyn HttpPort>,
    settings: SettingsStore,
    history: ChatHistoryStore,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(http: Rc<dyn HttpPort>, settings: SettingsStore, history: ChatHistoryStore) -> Self {
        Self {
            http,
            settings,
            history,
            endpoint: GEMINI_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn explain(&self, text: &str, is_new_conversation: bool) -> Result<Explanation> {
        let explanation = self.generate(&explain_prompt(text)).await?;

        if !is_new_conversation {
            return Ok(Explanation {
                explanation,
                chat_id: None,
                context: None,
            });
        }

        let chat_id = generate_chat_id();
        let context = vec![
            Turn::user(format!("Explain: {}", text)),
            Turn::assistant(explanation.clone()),
        ];
        self.history
            .append(Conversation::new(chat_id.clone(), text, context.clone()))
            .await?;
        log::info!("Started conversation {}", chat_id);

        Ok(Explanation {
            explanation,
            chat_id: Some(chat_id),
            context: Some(context),
        })
    }

    /// Answer `question` given `context`. Without a chat id the extended
    /// context is returned but not persisted.
    pub async fn follow_up(
        &self,
        question: &str,
        chat_id: Option<&str>,
        mut context: Vec<Turn>,
    ) -> Result<FollowUp> {
        let explanation = self.generate(&follow_up_prompt(question, &context)).await?;

        context.push(Turn::user(question));
        context.push(Turn::assistant(explanation.clone()));

        if let Some(id) = chat_id {
            self.history.update_by_id(id, context.clone()).await?;
        }

        Ok(FollowUp {
            explanation,
            context,
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let settings = self.settings.load().await?;
        if !settings.has_api_key() {
            return Err(LexiError::Config(MISSING_API_KEY.to_string()));
        }

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            settings.model_or_default(),
            settings.api_key.trim()
        );
        log::debug!("Gemini request to model {}", settings.model_or_default());

        let response = self.http.post_json(&url, &request_body(prompt)).await?;
        if !response.is_success() {
            let message = response
                .json()
                .and_then(|body| body["error"]["message"].as_str().map(String::from))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(LexiError::RemoteApi {
                status: response.status,
                message,
            });
        }

        Ok(response
            .json()
            .map(|body| extract_text(&body))
            .unwrap_or_else(|| NO_EXPLANATION.to_string()))
    }
}

pub fn explain_prompt(text: &str) -> String {
    format!("{}\n\n\"{}\"", EXPLAIN_INSTRUCTION, text)
}

pub fn follow_up_prompt(question: &str, context: &[Turn]) -> String {
    let mut prompt = String::new();
    if !context.is_empty() {
        let transcript: Vec<String> = context.iter().map(Turn::transcript_line).collect();
        prompt.push_str(&transcript.join("\n"));
        prompt.push('\n');
    }
    prompt.push_str(&format!("user: {}\n\n{}", question, FOLLOW_UP_INSTRUCTION));
    prompt
}

pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": GENERATION_CONFIG,
    })
}

// ─── API response types ──────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiResponse {
    candidates: Vec<ApiCandidate>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiCandidate {
    content: Option<ApiContent>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiContent {
    parts: Vec<ApiPart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiPart {
    text: Option<String>,
}

/// First candidate's first text part, trimmed. Missing or blank text
/// becomes a placeholder instead of an error.
pub fn extract_text(body: &Value) -> String {
    let parsed: ApiResponse = serde_json::from_value(body.clone()).unwrap_or_default();
    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_EXPLANATION.to_string())
}
