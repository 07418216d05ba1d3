use super::*;

const SNAPSHOT: &str = "./testdata/snapshot.json";

#[tokio::test]
async fn test_fetch_conversations_applies_contacts() {
    let source = SnapshotSource::new(SNAPSHOT);
    let contacts = source.load_contacts().await.unwrap();
    assert_eq!(contacts.len(), 2);

    let conversations = source.fetch_conversations(&contacts).await.unwrap();
    assert_eq!(conversations.len(), 3);

    let abby = &conversations[0];
    assert_eq!(abby.thread_id(), 42);
    assert_eq!(abby.title(), "Abby");
    assert_eq!(abby.photo_uri(), "content://contacts/abby");
    assert_eq!(abby.read(), false);

    let group = &conversations[1];
    assert_eq!(group.title(), "Climbing crew");
    assert_eq!(group.is_group_conversation(), true);

    let unknown = &conversations[2];
    assert_eq!(unknown.title(), "+15557770000");
    assert_eq!(unknown.read(), true);
}

#[tokio::test]
async fn test_fetch_conversations_without_contacts() {
    let source = SnapshotSource::new(SNAPSHOT);
    let conversations = source
        .fetch_conversations(&ContactBook::default())
        .await
        .unwrap();
    assert_eq!(conversations[0].title(), "+15551230000");
}

#[tokio::test]
async fn test_fetch_messages_filters_scheduled() {
    let source = SnapshotSource::new(SNAPSHOT);

    let messages = source.fetch_messages(42, false).await.unwrap();
    let ids = messages.iter().map(|m| m.id()).collect::<Vec<_>>();
    assert_eq!(ids, vec![99, 100]);
    assert_eq!(messages[1].first_phone_number(), "+15551230000");

    let messages = source.fetch_messages(42, true).await.unwrap();
    assert_eq!(messages.len(), 3);

    let messages = source.fetch_messages(7, true).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_missing_snapshot_is_unavailable() {
    let source = SnapshotSource::new("./testdata/missing.json");
    let err = source
        .fetch_conversations(&ContactBook::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Unavailable(_)));

    let err = source.load_contacts().await.unwrap_err();
    assert_eq!(err.to_string(), "loading contacts from ./testdata/missing.json");
}

#[tokio::test]
async fn test_malformed_snapshot() {
    let source = SnapshotSource::new("./testdata/snapshot_malformed.json");
    let err = source
        .fetch_conversations(&ContactBook::default())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Malformed(_)));
}
