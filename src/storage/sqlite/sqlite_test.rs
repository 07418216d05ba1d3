use super::*;
use crate::models::PhoneNumber;

async fn new_db() -> Sqlite {
    let db = Sqlite::new(None).await.unwrap();
    db.run_migration().await.unwrap();
    db
}

#[tokio::test]
async fn test_upsert_conversation() {
    let db = new_db().await;

    let expected = Conversation::new(7)
        .with_phone_number("+15551230000")
        .with_title("Abby")
        .with_snippet("see you")
        .with_date(100)
        .with_read(false)
        .with_scheduled(true);

    db.insert_or_update_conversation(expected.clone())
        .await
        .unwrap();

    let actual = db.get_conversation(7).await.unwrap();
    assert_eq!(actual, Some(expected.clone()));

    let updated = expected.clone().with_title("Abby Road").with_date(150);
    db.insert_or_update_conversation(updated.clone())
        .await
        .unwrap();

    let all = db.get_non_archived().await.unwrap();
    assert_eq!(all, vec![updated]);
    assert_eq!(db.get_conversation(8).await.unwrap(), None);
}

#[tokio::test]
async fn test_archived_partition() {
    let db = new_db().await;

    db.insert_or_update_conversation(Conversation::new(1).with_date(10))
        .await
        .unwrap();
    db.insert_or_update_conversation(Conversation::new(2).with_date(20).with_archived(true))
        .await
        .unwrap();
    db.insert_or_update_conversation(Conversation::new(3).with_date(30))
        .await
        .unwrap();

    let ids = |convos: Vec<Conversation>| convos.iter().map(|c| c.thread_id()).collect::<Vec<_>>();
    assert_eq!(ids(db.get_non_archived().await.unwrap()), vec![3, 1]);
    assert_eq!(ids(db.get_all_archived().await.unwrap()), vec![2]);
}

#[tokio::test]
async fn test_insert_messages_and_reassign() {
    let db = new_db().await;

    let participant = Participant::new("Abby").with_phone_number(PhoneNumber::new("+1 555 123 0000"));
    let messages = vec![
        Message::new(1, 7, "grab lunch")
            .with_date(100)
            .with_scheduled(true)
            .with_participants(vec![participant.clone()]),
        Message::new(2, 7, "later").with_date(110),
        Message::new(3, 9, "other thread").with_date(120),
    ];
    db.insert_messages(&messages).await.unwrap();

    let thread = db.get_thread_messages(7).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].participants(), &[participant]);

    let scheduled = db.get_scheduled_thread_messages(7).await.unwrap();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].id(), 1);

    let moved = thread
        .into_iter()
        .map(|m| m.with_thread_id(42))
        .collect::<Vec<_>>();
    db.insert_messages(&moved).await.unwrap();

    assert_eq!(db.get_thread_messages(7).await.unwrap().len(), 0);
    assert_eq!(db.get_thread_messages(42).await.unwrap().len(), 2);
    assert_eq!(db.get_thread_messages(9).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_thread_id_removes_messages() {
    let db = new_db().await;

    db.insert_or_update_conversation(Conversation::new(5))
        .await
        .unwrap();
    db.insert_messages(&[Message::new(1, 5, "hi"), Message::new(2, 6, "hey")])
        .await
        .unwrap();

    db.delete_thread_id(5).await.unwrap();

    assert_eq!(db.get_conversation(5).await.unwrap(), None);
    assert_eq!(db.get_thread_messages(5).await.unwrap().len(), 0);
    assert_eq!(db.get_thread_messages(6).await.unwrap().len(), 1);

    db.delete_message(2).await.unwrap();
    assert_eq!(db.get_thread_messages(6).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_text_search_is_case_insensitive() {
    let db = new_db().await;

    db.insert_or_update_conversation(Conversation::new(1).with_title("Abby"))
        .await
        .unwrap();
    db.insert_or_update_conversation(
        Conversation::new(2)
            .with_title("Bob")
            .with_phone_number("+15550001111"),
    )
    .await
    .unwrap();
    db.insert_messages(&[
        Message::new(10, 2, "grab lunch"),
        Message::new(11, 2, "nothing here"),
    ])
    .await
    .unwrap();

    let convos = db.get_conversations_with_text("%ab%").await.unwrap();
    assert_eq!(convos.len(), 1);
    assert_eq!(convos[0].title(), "Abby");

    let convos = db.get_conversations_with_text("%0001%").await.unwrap();
    assert_eq!(convos.len(), 1);
    assert_eq!(convos[0].thread_id(), 2);

    let messages = db.get_messages_with_text("%AB%").await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id(), 10);
}

#[tokio::test]
async fn test_set_read() {
    let db = new_db().await;

    db.insert_or_update_conversation(Conversation::new(1).with_read(false))
        .await
        .unwrap();
    db.insert_messages(&[Message::new(1, 1, "hi").with_read(false)])
        .await
        .unwrap();

    db.set_read(1, true).await.unwrap();

    assert_eq!(db.get_conversation(1).await.unwrap().unwrap().read(), true);
    assert_eq!(db.get_thread_messages(1).await.unwrap()[0].read(), true);
}

#[tokio::test]
async fn test_preferences_round_trip() {
    let db = new_db().await;

    let defaults = db.load_preferences().await.unwrap();
    assert_eq!(defaults, Preferences::default());

    let preferences = Preferences::default()
        .with_pinned(42)
        .with_pinned(7)
        .with_unread_at_top(true)
        .with_app_run_count(3);
    db.save_preferences(&preferences).await.unwrap();

    let actual = db.load_preferences().await.unwrap();
    assert_eq!(actual, preferences);
    assert!(actual.is_pinned(42));
    assert!(!actual.is_pinned(8));
}
