//! Chat history store: a bounded, newest-first list of conversations
//! kept in the local storage area under a single key.
//!
//! Every operation reloads the full list; nothing is cached. Writes through
//! one store instance are serialized by `write_lock` so concurrent
//! append/update calls in the background process cannot overwrite each
//! other. Writers in other surfaces still race (last write wins).

use std::rc::Rc;
use futures::lock::Mutex;
use lexi_types::{
    Result,
    conversation::Conversation,
    message::Turn,
};
use crate::ports::StoragePort;

pub const HISTORY_KEY: &str = "chatHistory";
pub const MAX_CONVERSATIONS: usize = 50;

#[derive(Clone)]
pub struct ChatHistoryStore {
    storage: Rc<dyn StoragePort>,
    write_lock: Rc<Mutex<()>>,
}

impl ChatHistoryStore {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self {
            storage,
            write_lock: Rc::new(Mutex::new(())),
        }
    }

    /// Full history, newest first
    pub async fn list(&self) -> Result<Vec<Conversation>> {
        match self.storage.get(HISTORY_KEY).await? {
            Some(value) if !value.is_null() => Ok(serde_json::from_value(value)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Insert at the front; anything beyond `MAX_CONVERSATIONS` is dropped.
    pub async fn append(&self, conversation: Conversation) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.list().await?;
        history.insert(0, conversation);
        history.truncate(MAX_CONVERSATIONS);
        self.persist(&history).await
    }

    /// Replace the context of conversation `id` and refresh its timestamp.
    /// Unknown ids are ignored; returns whether a conversation was updated.
    pub async fn update_by_id(&self, id: &str, context: Vec<Turn>) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.list().await?;
        let Some(conversation) = history.iter_mut().find(|c| c.id == id) else {
            log::debug!("No conversation {} in history, update skipped", id);
            return Ok(false);
        };
        conversation.touch(context);
        self.persist(&history).await?;
        Ok(true)
    }

    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.persist(&[]).await
    }

    async fn persist(&self, history: &[Conversation]) -> Result<()> {
        self.storage
            .set(HISTORY_KEY, serde_json::to_value(history)?)
            .await
    }
}
