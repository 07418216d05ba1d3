#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use crate::{
    config::constants::MIN_SEARCH_LENGTH,
    models::{Conversation, ConversationsUpdate, ListOrigin, SearchResult},
};

/// What the conversation list area shows besides the rows themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    /// First launch with nothing cached yet; waiting on the message store.
    #[default]
    Loading,
    Empty,
    Ready,
}

#[derive(Debug, Default)]
pub struct AppState {
    conversations: Vec<Conversation>,
    status: ListStatus,
    unread_count: usize,
    synced: bool,
    backfill_pending: bool,
    source_error: Option<String>,

    search_query: String,
    search_pending: bool,
    search_results: Vec<SearchResult>,
}

impl AppState {
    /// Replaces the whole list, and the badge when it changed, in one step.
    pub fn set_conversations(&mut self, update: ConversationsUpdate) {
        let empty = update.conversations.is_empty();
        let waiting = update.origin == ListOrigin::Cache && update.first_run;
        self.status = match (waiting, empty) {
            (true, true) => ListStatus::Loading,
            (_, true) => ListStatus::Empty,
            (_, false) => ListStatus::Ready,
        };
        self.conversations = update.conversations;

        if let Some(count) = update.unread_count {
            self.unread_count = count;
        }

        if let ListOrigin::Sync { source_error } = update.origin {
            self.synced = true;
            self.backfill_pending = update.first_run && source_error.is_none();
            self.source_error = source_error;
        }
    }

    pub fn set_backfill_completed(&mut self) {
        self.backfill_pending = false;
    }

    /// Records `query` as the current search text. Short queries drop the
    /// shown results right away.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        if self.search_query.chars().count() < MIN_SEARCH_LENGTH {
            self.search_results.clear();
            self.search_pending = false;
        } else {
            self.search_pending = true;
        }
    }

    /// Applies results only when they answer the current query.
    pub fn set_search_results(&mut self, query: &str, results: Vec<SearchResult>) -> bool {
        if query != self.search_query {
            return false;
        }
        self.search_results = results;
        self.search_pending = false;
        true
    }

    pub fn clear_search(&mut self, query: &str) -> bool {
        if query != self.search_query {
            return false;
        }
        self.search_results.clear();
        self.search_pending = false;
        true
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// True once a sync attempt finished, successful or not.
    pub fn synced(&self) -> bool {
        self.synced
    }

    pub fn backfill_pending(&self) -> bool {
        self.backfill_pending
    }

    pub fn source_error(&self) -> Option<&str> {
        self.source_error.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_pending(&self) -> bool {
        self.search_pending
    }

    pub fn search_results(&self) -> &[SearchResult] {
        &self.search_results
    }
}
