#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;

use crate::{
    config::{DisplayConfig, constants::MIN_SEARCH_LENGTH},
    models::{Conversation, ConversationResult, Message, SearchMessageResult, SearchResult},
    presentation::format_date_or_time,
    storage::{ArcStorage, Storage},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query is too short to run; any shown results go away.
    Cleared,
    Results(Vec<SearchResult>),
    /// A newer query was issued while this one ran.
    Superseded,
}

/// Free-text search over the cache. Only the most recently issued query may
/// publish results.
pub struct SearchEngine {
    storage: ArcStorage,
    display: DisplayConfig,
    last_query: Mutex<String>,
}

impl SearchEngine {
    pub fn new(storage: ArcStorage, display: DisplayConfig) -> Self {
        Self {
            storage,
            display,
            last_query: Mutex::new(String::new()),
        }
    }

    pub async fn search(&self, text: &str) -> SearchOutcome {
        self.issue(text).await;
        self.complete(text).await
    }

    /// Records `text` as the latest query.
    pub async fn issue(&self, text: &str) {
        *self.last_query.lock().await = text.to_string();
    }

    /// Runs `text` against the cache. The results are dropped when `text` is
    /// no longer the latest issued query by the time they are ready.
    pub async fn complete(&self, text: &str) -> SearchOutcome {
        if text.chars().count() < MIN_SEARCH_LENGTH {
            return SearchOutcome::Cleared;
        }

        let pattern = format!("%{text}%");
        let messages = self
            .storage
            .get_messages_with_text(&pattern)
            .await
            .unwrap_or_else(|err| {
                log::warn!("Message search failed: {err:#}");
                vec![]
            });
        let conversations = self
            .storage
            .get_conversations_with_text(&pattern)
            .await
            .unwrap_or_else(|err| {
                log::warn!("Conversation search failed: {err:#}");
                vec![]
            });

        if *self.last_query.lock().await != text {
            log::trace!("Dropping results of superseded query {text:?}");
            return SearchOutcome::Superseded;
        }

        SearchOutcome::Results(build_results(
            conversations,
            messages,
            Local::now(),
            &self.display,
        ))
    }

    pub async fn last_query(&self) -> String {
        self.last_query.lock().await.clone()
    }
}

/// Conversation hits come first in the order given, followed by message hits
/// with the newest message id first.
pub fn build_results(
    conversations: Vec<Conversation>,
    mut messages: Vec<Message>,
    now: DateTime<Local>,
    display: &DisplayConfig,
) -> Vec<SearchResult> {
    messages.sort_by_key(|m| std::cmp::Reverse(m.id()));

    let mut results = Vec::with_capacity(conversations.len() + messages.len());
    for conversation in conversations {
        results.push(SearchResult::Conversation(ConversationResult {
            thread_id: conversation.thread_id(),
            title: conversation.title().to_string(),
            phone_number: conversation.phone_number().to_string(),
            snippet: conversation.phone_number().to_string(),
            date: format_date_or_time(conversation.date(), now, display),
            photo_uri: conversation.photo_uri().to_string(),
        }));
    }

    for message in messages {
        results.push(SearchResult::Message(SearchMessageResult {
            message_id: message.id(),
            thread_id: message.thread_id(),
            title: message.recipient_label(),
            phone_number: message.first_phone_number(),
            snippet: message.body().to_string(),
            date: format_date_or_time(message.date(), now, display),
            photo_uri: message.sender_photo_uri().to_string(),
        }));
    }
    results
}
