#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// A cached summary of one message thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    thread_id: i64,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    photo_uri: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    date: i64,
    #[serde(default = "default_read")]
    read: bool,
    #[serde(default)]
    is_group_conversation: bool,
    #[serde(default)]
    is_scheduled: bool,
    #[serde(default)]
    is_archived: bool,
}

impl Conversation {
    pub fn new(thread_id: i64) -> Self {
        Self {
            thread_id,
            ..Default::default()
        }
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = phone_number.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_photo_uri(mut self, photo_uri: impl Into<String>) -> Self {
        self.photo_uri = photo_uri.into();
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = snippet.into();
        self
    }

    pub fn with_date(mut self, date: i64) -> Self {
        self.date = date;
        self
    }

    pub fn with_read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn with_group(mut self, is_group_conversation: bool) -> Self {
        self.is_group_conversation = is_group_conversation;
        self
    }

    pub fn with_scheduled(mut self, is_scheduled: bool) -> Self {
        self.is_scheduled = is_scheduled;
        self
    }

    pub fn with_archived(mut self, is_archived: bool) -> Self {
        self.is_archived = is_archived;
        self
    }

    pub fn thread_id(&self) -> i64 {
        self.thread_id
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn photo_uri(&self) -> &str {
        &self.photo_uri
    }

    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn date(&self) -> i64 {
        self.date
    }

    pub fn read(&self) -> bool {
        self.read
    }

    pub fn is_group_conversation(&self) -> bool {
        self.is_group_conversation
    }

    pub fn is_scheduled(&self) -> bool {
        self.is_scheduled
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_photo_uri(&mut self, photo_uri: impl Into<String>) {
        self.photo_uri = photo_uri.into();
    }

    pub fn set_date(&mut self, date: i64) {
        self.date = date;
    }

    pub fn set_read(&mut self, read: bool) {
        self.read = read;
    }

    pub fn set_archived(&mut self, is_archived: bool) {
        self.is_archived = is_archived;
    }

    /// Normalized form of the thread address, used to match a provisional
    /// thread against the real one.
    pub fn normalized_phone_number(&self) -> String {
        normalize_address(&self.phone_number)
    }

    /// Compares the fields owned by the authoritative store. The archive
    /// and read flags are local state and are left out.
    pub fn same_contents(&self, other: &Conversation) -> bool {
        self.thread_id == other.thread_id
            && self.phone_number == other.phone_number
            && self.title == other.title
            && self.photo_uri == other.photo_uri
            && self.snippet == other.snippet
            && self.date == other.date
            && self.is_group_conversation == other.is_group_conversation
            && self.is_scheduled == other.is_scheduled
    }

    /// Builds the record persisted when the cached and authoritative copies
    /// of a thread disagree. Everything comes from `authoritative` except the
    /// date, which never moves backwards, and the local archive flag. A local
    /// read toggle holds until the thread sees newer activity.
    pub fn merged_with(cached: &Conversation, authoritative: &Conversation) -> Conversation {
        let mut merged = authoritative.clone();
        merged.date = cached.date.max(authoritative.date);
        merged.is_archived = cached.is_archived;
        if authoritative.date <= cached.date {
            merged.read = cached.read;
        }
        merged
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            thread_id: 0,
            phone_number: String::new(),
            title: String::new(),
            photo_uri: String::new(),
            snippet: String::new(),
            date: 0,
            read: true,
            is_group_conversation: false,
            is_scheduled: false,
            is_archived: false,
        }
    }
}

/// Keeps digits and a leading `+`. Multi-recipient addresses are split on
/// `,` or `;`, normalized one by one and joined back with `,`.
pub fn normalize_address(address: &str) -> String {
    address
        .split([',', ';'])
        .map(normalize_phone_number)
        .filter(|number| !number.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn normalize_phone_number(number: &str) -> String {
    let number = number.trim();
    let mut ret = String::with_capacity(number.len());
    if number.starts_with('+') {
        ret.push('+');
    }
    ret.extend(number.chars().filter(|c| c.is_ascii_digit()));
    if ret == "+" {
        return String::new();
    }
    ret
}

pub(crate) fn default_read() -> bool {
    true
}
