#[cfg(test)]
#[path = "expiry_test.rs"]
mod tests;

use eyre::{Context, Result};

use crate::storage::{ArcStorage, Storage};

/// Deletes the scheduled messages of `thread_id` that are due before
/// `now_ms + grace_ms`. When nothing is left to send and the thread is
/// provisional, the thread goes too; the return value tells whether it did.
pub async fn clear_expired_scheduled_messages(
    storage: &ArcStorage,
    thread_id: i64,
    now_ms: i64,
    grace_ms: i64,
) -> Result<bool> {
    let deadline = now_ms + grace_ms;
    let (expired, pending): (Vec<_>, Vec<_>) = storage
        .get_scheduled_thread_messages(thread_id)
        .await
        .wrap_err(format!("reading scheduled messages of {thread_id}"))?
        .into_iter()
        .partition(|message| message.date() < deadline);

    for message in &expired {
        storage
            .delete_message(message.id())
            .await
            .wrap_err(format!("deleting expired message {}", message.id()))?;
    }
    if !expired.is_empty() {
        log::debug!(
            "Removed {} expired scheduled messages from thread {thread_id}",
            expired.len()
        );
    }

    if !pending.is_empty() {
        return Ok(false);
    }

    match storage.get_conversation(thread_id).await? {
        Some(conversation) if conversation.is_scheduled() => {
            storage
                .delete_thread_id(thread_id)
                .await
                .wrap_err(format!("deleting provisional thread {thread_id}"))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}
