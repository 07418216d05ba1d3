use std::sync::Arc;

use super::*;
use crate::{
    models::{Conversation, Message},
    storage::{Storage, sqlite::Sqlite},
};

async fn new_storage() -> ArcStorage {
    let db = Sqlite::new(None).await.unwrap();
    db.run_migration().await.unwrap();
    Arc::new(db)
}

#[tokio::test]
async fn test_keeps_provisional_thread_with_future_message() {
    let storage = new_storage().await;
    storage
        .insert_or_update_conversation(Conversation::new(7).with_scheduled(true))
        .await
        .unwrap();
    storage
        .insert_messages(&[
            Message::new(1, 7, "due").with_date(1_000).with_scheduled(true),
            Message::new(2, 7, "later").with_date(10_000).with_scheduled(true),
        ])
        .await
        .unwrap();

    let removed = clear_expired_scheduled_messages(&storage, 7, 2_000, 500)
        .await
        .unwrap();

    assert!(!removed);
    let left = storage.get_thread_messages(7).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id(), 2);
    assert!(storage.get_conversation(7).await.unwrap().is_some());
}

#[tokio::test]
async fn test_grace_period_counts_as_due() {
    let storage = new_storage().await;
    storage
        .insert_or_update_conversation(Conversation::new(7).with_scheduled(true))
        .await
        .unwrap();
    storage
        .insert_messages(&[Message::new(1, 7, "soon").with_date(2_300).with_scheduled(true)])
        .await
        .unwrap();

    let removed = clear_expired_scheduled_messages(&storage, 7, 2_000, 500)
        .await
        .unwrap();

    assert!(removed);
    assert_eq!(storage.get_conversation(7).await.unwrap(), None);
    assert!(storage.get_thread_messages(7).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_real_thread_is_never_removed() {
    let storage = new_storage().await;
    storage
        .insert_or_update_conversation(Conversation::new(42))
        .await
        .unwrap();
    storage
        .insert_messages(&[
            Message::new(1, 42, "sent").with_date(100),
            Message::new(2, 42, "due").with_date(1_000).with_scheduled(true),
        ])
        .await
        .unwrap();

    let removed = clear_expired_scheduled_messages(&storage, 42, 2_000, 500)
        .await
        .unwrap();

    assert!(!removed);
    assert!(storage.get_conversation(42).await.unwrap().is_some());
    let left = storage.get_thread_messages(42).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id(), 1);
}
