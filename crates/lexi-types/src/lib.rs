pub mod config;
pub mod conversation;
pub mod error;
pub mod event;
pub mod message;
pub mod protocol;


pub use error::LexiError;
pub type Result<T> = std::result::Result<T, LexiError>;
