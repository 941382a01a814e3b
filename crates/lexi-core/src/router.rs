//! Message router: the background process's single entry point.
//!
//! `dispatch` maps one inbound JSON message to exactly one reply envelope.
//! Errors from the clients are folded into `{ ok: false, error }`; nothing
//! is allowed to escape to the transport.

use serde_json::Value;
use lexi_types::{
    Result,
    protocol::{Request, Response, UNKNOWN_MESSAGE_TYPE},
};
use crate::dictionary::DictionaryClient;
use crate::gemini::GeminiClient;

pub struct Router {
    dictionary: DictionaryClient,
    gemini: GeminiClient,
}

impl Router {
    pub fn new(dictionary: DictionaryClient, gemini: GeminiClient) -> Self {
        Self { dictionary, gemini }
    }

    pub fn gemini(&self) -> &GeminiClient {
        &self.gemini
    }

    /// Decode and handle a raw message.
    pub async fn dispatch(&self, message: &Value) -> Response {
        let request = match parse_request(message) {
            Ok(req) => req,
            Err(reply) => return reply,
        };
        self.handle(request).await
    }

    /// Handle an already-decoded request.
    pub async fn handle(&self, request: Request) -> Response {
        let kind = request.type_name();
        log::debug!("Routing {}", kind);
        match self.route(request).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("{} failed: {}", kind, e);
                Response::failure(e.to_string())
            }
        }
    }

    async fn route(&self, request: Request) -> Result<Response> {
        match request {
            Request::Ping => Ok(Response::pong()),
            Request::DictLookup { text } => {
                let definition = self.dictionary.lookup(&text).await?;
                Ok(Response::definition(definition))
            }
            Request::AiExplain {
                text,
                is_new_conversation,
            } => {
                let result = self.gemini.explain(&text, is_new_conversation).await?;
                Ok(Response::explanation(
                    result.explanation,
                    result.chat_id,
                    result.context,
                ))
            }
            Request::AiFollowUp {
                question,
                chat_id,
                context,
            } => {
                let result = self
                    .gemini
                    .follow_up(&question, chat_id.as_deref(), context)
                    .await?;
                Ok(Response::explanation(
                    result.explanation,
                    None,
                    Some(result.context),
                ))
            }
        }
    }
}

/// Unknown or missing `type` tags fail closed with "Unknown message type";
/// a known type with a bad payload fails with the decode error.
pub fn parse_request(message: &Value) -> std::result::Result<Request, Response> {
    let kind = message.get("type").and_then(Value::as_str).unwrap_or_default();
    if !Request::KNOWN_TYPES.contains(&kind) {
        return Err(Response::failure(UNKNOWN_MESSAGE_TYPE));
    }
    serde_json::from_value(message.clone())
        .map_err(|e| Response::failure(format!("Malformed {} request: {}", kind, e)))
}
