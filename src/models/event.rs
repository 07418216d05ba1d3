use std::sync::Arc;

use tokio::sync::mpsc;

use super::{Conversation, SearchResult};

#[derive(Debug)]
pub enum Event {
    ConversationsLoaded(ConversationsUpdate),
    BackfillCompleted { threads: usize, messages: usize },

    SearchResults { query: String, results: Vec<SearchResult> },
    /// The query was too short to run.
    SearchCleared(String),

    Quit,
}

/// A full replacement of the conversation list, already sorted. The badge
/// travels with the list so both change in the same step.
#[derive(Debug, Clone)]
pub struct ConversationsUpdate {
    pub conversations: Vec<Conversation>,
    pub origin: ListOrigin,
    pub first_run: bool,
    /// Set when the unread count changed.
    pub unread_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOrigin {
    /// Fast-path read of the cache, shown before syncing.
    Cache,
    /// End of a sync attempt. When the message store could not be read the
    /// list is the cache as it stands and the reason is attached.
    Sync { source_error: Option<String> },
    /// Re-read after a local change.
    Local,
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
