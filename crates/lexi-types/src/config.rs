use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// User settings, persisted in the synced storage area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub auto_lookup: bool,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            auto_lookup: true,
            dark_mode: true,
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Model id to call; an empty setting falls back to the default model.
    pub fn model_or_default(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            DEFAULT_MODEL
        } else {
            model
        }
    }
}

/// A Gemini model offered in the options page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeminiModel {
    pub id: &'static str,
    pub label: &'static str,
}

pub const GEMINI_MODELS: &[GeminiModel] = &[
    GeminiModel { id: "gemini-2.5-flash-lite", label: "Flash 2.5 lite (new)" },
    GeminiModel { id: "gemini-2.5-flash", label: "Flash 2.5 (Newest)" },
    GeminiModel { id: "gemini-1.5-pro-latest", label: "Gemini 1.5 Pro (Latest)" },
    GeminiModel { id: "gemini-2.5-pro", label: "Pro 2.5 (Most Capable)" },
    GeminiModel { id: "gemini-3-flash-preview", label: "Flash 3 (Newest)" },
    GeminiModel { id: "gemini-3-pro-preview", label: "Pro 3.0 (paid)" },
];

/// Label for a model id, or the id itself when it is not in the known list.
pub fn model_label(id: &str) -> &str {
    GEMINI_MODELS
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.label)
        .unwrap_or(id)
}
