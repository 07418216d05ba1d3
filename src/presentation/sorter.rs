#[cfg(test)]
#[path = "sorter_test.rs"]
mod tests;

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeSet;

use crate::models::{Conversation, Preferences};

/// Ordering inputs for the conversation list, taken from the preferences at
/// the time of the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortPolicy {
    pub unread_at_top: bool,
    pub pinned: BTreeSet<String>,
}

impl SortPolicy {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            unread_at_top: preferences.unread_at_top,
            pinned: preferences.pinned_conversations.clone(),
        }
    }

    pub fn is_pinned(&self, conversation: &Conversation) -> bool {
        self.pinned.contains(&conversation.thread_id().to_string())
    }

    fn compare(&self, a: &Conversation, b: &Conversation) -> Ordering {
        let pinned = Reverse(self.is_pinned(a)).cmp(&Reverse(self.is_pinned(b)));
        if self.unread_at_top {
            pinned
                .then(a.read().cmp(&b.read()))
                .then(b.date().cmp(&a.date()))
        } else {
            pinned
                .then(b.date().cmp(&a.date()))
                .then(b.is_group_conversation().cmp(&a.is_group_conversation()))
        }
    }
}

/// Pinned threads first. Then unread before read and newest first when
/// `unread_at_top` is set, or newest first and groups before one-to-one
/// threads otherwise. Ties keep their input order.
pub fn sort_conversations(
    mut conversations: Vec<Conversation>,
    policy: &SortPolicy,
) -> Vec<Conversation> {
    conversations.sort_by(|a, b| policy.compare(a, b));
    conversations
}
