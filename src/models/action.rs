/// Requests sent from the interactive context to the background queue.
#[derive(Debug, Clone)]
pub enum Action {
    /// Show the cache, then reconcile it with the message store.
    LoadConversations,
    Search(String),
    SetRead { thread_id: i64, read: bool },
    SetPinned { thread_id: i64, pinned: bool },
    SetUnreadAtTop(bool),
}
