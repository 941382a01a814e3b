pub mod ports;
pub mod dictionary;
pub mod gemini;
pub mod history;
pub mod settings;
pub mod router;
pub mod retry;
pub mod markdown;
pub mod page;
pub mod popup;
pub mod event_bus;
