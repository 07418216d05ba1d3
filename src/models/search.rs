/// Message id carried by results that point at a whole conversation.
pub const NO_MESSAGE_ID: i64 = -1;

/// One row of the search result list. Conversation hits open the thread,
/// message hits open the thread scrolled to the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Conversation(ConversationResult),
    Message(SearchMessageResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationResult {
    pub thread_id: i64,
    pub title: String,
    pub phone_number: String,
    pub snippet: String,
    pub date: String,
    pub photo_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMessageResult {
    pub message_id: i64,
    pub thread_id: i64,
    pub title: String,
    pub phone_number: String,
    pub snippet: String,
    pub date: String,
    pub photo_uri: String,
}

impl SearchResult {
    pub fn thread_id(&self) -> i64 {
        match self {
            SearchResult::Conversation(c) => c.thread_id,
            SearchResult::Message(m) => m.thread_id,
        }
    }

    pub fn message_id(&self) -> i64 {
        match self {
            SearchResult::Conversation(_) => NO_MESSAGE_ID,
            SearchResult::Message(m) => m.message_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchResult::Conversation(c) => &c.title,
            SearchResult::Message(m) => &m.title,
        }
    }

    pub fn snippet(&self) -> &str {
        match self {
            SearchResult::Conversation(c) => &c.snippet,
            SearchResult::Message(m) => &m.snippet,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            SearchResult::Conversation(c) => &c.date,
            SearchResult::Message(m) => &m.date,
        }
    }

    /// Where opening this result should land.
    pub fn target(&self) -> OpenTarget {
        OpenTarget {
            thread_id: self.thread_id(),
            title: self.title().to_string(),
            message_id: match self {
                SearchResult::Conversation(_) => None,
                SearchResult::Message(m) => Some(m.message_id),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTarget {
    pub thread_id: i64,
    pub title: String,
    pub message_id: Option<i64>,
}
