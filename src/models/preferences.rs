use std::collections::BTreeSet;

/// User preferences that shape how the cache is presented. Owned by the
/// preference store and handed to the reconciler and sorter explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub pinned_conversations: BTreeSet<String>,
    pub unread_at_top: bool,
    pub app_run_count: u64,
}

impl Preferences {
    pub fn with_pinned(mut self, thread_id: i64) -> Self {
        self.pin(thread_id);
        self
    }

    pub fn with_unread_at_top(mut self, unread_at_top: bool) -> Self {
        self.unread_at_top = unread_at_top;
        self
    }

    pub fn with_app_run_count(mut self, app_run_count: u64) -> Self {
        self.app_run_count = app_run_count;
        self
    }

    pub fn pin(&mut self, thread_id: i64) {
        self.pinned_conversations.insert(thread_id.to_string());
    }

    pub fn unpin(&mut self, thread_id: i64) {
        self.pinned_conversations.remove(&thread_id.to_string());
    }

    pub fn is_pinned(&self, thread_id: i64) -> bool {
        self.pinned_conversations.contains(&thread_id.to_string())
    }

    /// The one-time history backfill only runs on the first launch.
    pub fn is_first_run(&self) -> bool {
        self.app_run_count == 1
    }
}
