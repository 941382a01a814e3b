//! Remote dictionary client (Free Dictionary API).
//!
//! Looks up the first word of a selection and renders a short plain-text
//! summary: headword, phonetic spelling, then up to three parts of speech
//! with up to two definitions each.

use std::rc::Rc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use serde_json::Value;
use lexi_types::{LexiError, Result};
use crate::ports::HttpPort;

pub const DICTIONARY_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
pub const NO_DEFINITION: &str = "No definition found.";

const MAX_MEANINGS: usize = 3;
const MAX_DEFINITIONS: usize = 2;

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub struct DictionaryClient {
    http: Rc<dyn HttpPort>,
    endpoint: String,
}

impl DictionaryClient {
    pub fn new(http: Rc<dyn HttpPort>) -> Self {
        Self::with_endpoint(http, DICTIONARY_ENDPOINT)
    }

    pub fn with_endpoint(http: Rc<dyn HttpPort>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn url_for(&self, word: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            utf8_percent_encode(word, URI_COMPONENT)
        )
    }

    /// Look up the first whitespace-delimited token of `text`.
    pub async fn lookup(&self, text: &str) -> Result<String> {
        let Some(word) = lookup_key(text) else {
            return Ok(NO_DEFINITION.to_string());
        };
        let url = self.url_for(word);
        log::debug!("Dictionary lookup: {}", word);

        let response = self.http.get(&url).await?;
        if !response.is_success() {
            return Err(LexiError::Dictionary {
                status: response.status,
            });
        }

        Ok(match response.json() {
            Some(body) => format_definition(&body),
            None => NO_DEFINITION.to_string(),
        })
    }
}

/// Multi-word selections are truncated to their first word.
pub fn lookup_key(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

// ─── API response types ──────────────────────────────────────

// Meanings, definitions and phonetics are decoded one at a time, so a
// malformed item is skipped instead of discarding the whole entry.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Entry {
    word: Option<String>,
    phonetic: Option<String>,
    phonetics: Vec<Value>,
    meanings: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Phonetic {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Meaning {
    part_of_speech: String,
    definitions: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Definition {
    definition: Option<String>,
    example: Option<String>,
}

/// Decode the first `limit` items of `items`, dropping those that fail.
fn decode_some<T: serde::de::DeserializeOwned>(items: &[Value], limit: usize) -> Vec<T> {
    items
        .iter()
        .take(limit)
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

impl Entry {
    fn phonetic_text(&self) -> Option<String> {
        decode_some::<Phonetic>(&self.phonetics, self.phonetics.len())
            .into_iter()
            .filter_map(|p| p.text)
            .find(|t| !t.is_empty())
            .or_else(|| self.phonetic.clone().filter(|t| !t.is_empty()))
    }
}

/// Render a dictionary response body. Deterministic for a given body.
pub fn format_definition(body: &Value) -> String {
    match body {
        Value::Array(items) => {
            let entry = items
                .first()
                .and_then(|v| serde_json::from_value::<Entry>(v.clone()).ok());
            match entry {
                Some(entry) => format_entry(&entry),
                None => NO_DEFINITION.to_string(),
            }
        }
        Value::Object(map) => match map.get("title").and_then(Value::as_str) {
            Some(title) => title.to_string(),
            None => NO_DEFINITION.to_string(),
        },
        _ => NO_DEFINITION.to_string(),
    }
}

fn format_entry(entry: &Entry) -> String {
    let mut lines = Vec::new();
    if let Some(word) = entry.word.as_deref().filter(|w| !w.is_empty()) {
        lines.push(format!("• {}", word));
    }
    if let Some(phonetic) = entry.phonetic_text() {
        lines.push(format!("  {}", phonetic));
    }
    let meanings: Vec<Meaning> = decode_some(&entry.meanings, MAX_MEANINGS);
    for (i, meaning) in meanings.iter().enumerate() {
        lines.push(format!("\n{}. ({})", i + 1, meaning.part_of_speech));
        let definitions: Vec<Definition> = decode_some(&meaning.definitions, MAX_DEFINITIONS);
        for def in &definitions {
            if let Some(text) = def.definition.as_deref() {
                lines.push(format!("   - {}", text));
            }
            if let Some(example) = def.example.as_deref().filter(|e| !e.is_empty()) {
                lines.push(format!("     e.g., {}", example));
            }
        }
    }
    if lines.is_empty() {
        return NO_DEFINITION.to_string();
    }
    lines.join("\n")
}
