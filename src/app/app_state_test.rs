use super::*;
use crate::models::{ConversationResult, NO_MESSAGE_ID};

fn update(conversations: Vec<Conversation>, origin: ListOrigin, first_run: bool) -> ConversationsUpdate {
    ConversationsUpdate {
        conversations,
        origin,
        first_run,
        unread_count: None,
    }
}

fn synced(source_error: Option<&str>) -> ListOrigin {
    ListOrigin::Sync {
        source_error: source_error.map(str::to_string),
    }
}

fn result(thread_id: i64) -> SearchResult {
    SearchResult::Conversation(ConversationResult {
        thread_id,
        title: "Abby".to_string(),
        phone_number: String::new(),
        snippet: String::new(),
        date: String::new(),
        photo_uri: String::new(),
    })
}

#[test]
fn test_first_run_shows_loading_until_synced() {
    let mut state = AppState::default();

    state.set_conversations(update(vec![], ListOrigin::Cache, true));
    assert_eq!(state.status(), ListStatus::Loading);
    assert!(!state.synced());

    state.set_conversations(update(vec![Conversation::new(42)], synced(None), true));
    assert_eq!(state.status(), ListStatus::Ready);
    assert!(state.synced());
    assert!(state.backfill_pending());

    state.set_backfill_completed();
    assert!(!state.backfill_pending());
}

#[test]
fn test_empty_cache_after_first_run_shows_placeholder() {
    let mut state = AppState::default();
    state.set_conversations(update(vec![], ListOrigin::Cache, false));
    assert_eq!(state.status(), ListStatus::Empty);
}

#[test]
fn test_source_unavailable_keeps_list() {
    let mut state = AppState::default();
    state.set_conversations(update(vec![Conversation::new(1)], ListOrigin::Cache, true));
    state.set_conversations(update(vec![Conversation::new(1)], synced(Some("denied")), true));

    assert_eq!(state.conversations().len(), 1);
    assert_eq!(state.status(), ListStatus::Ready);
    assert_eq!(state.source_error(), Some("denied"));
    assert!(state.synced());
    assert!(!state.backfill_pending());

    state.set_conversations(update(vec![], synced(Some("denied")), false));
    assert_eq!(state.status(), ListStatus::Empty);
}

#[test]
fn test_badge_changes_with_the_list() {
    let mut state = AppState::default();
    let mut first = update(vec![Conversation::new(1).with_read(false)], synced(None), false);
    first.unread_count = Some(1);
    state.set_conversations(first);
    assert_eq!(state.unread_count(), 1);
    assert!(state.synced());

    state.set_conversations(update(vec![Conversation::new(1)], ListOrigin::Local, false));
    assert_eq!(state.unread_count(), 1);

    let mut cleared = update(vec![Conversation::new(1)], ListOrigin::Local, false);
    cleared.unread_count = Some(0);
    state.set_conversations(cleared);
    assert_eq!(state.unread_count(), 0);
}

#[test]
fn test_local_refresh_keeps_sync_state() {
    let mut state = AppState::default();
    state.set_conversations(update(vec![Conversation::new(1)], synced(None), true));
    assert!(state.backfill_pending());

    state.set_conversations(update(vec![Conversation::new(1)], ListOrigin::Local, false));
    assert!(state.backfill_pending());
}

#[test]
fn test_stale_search_results_are_ignored() {
    let mut state = AppState::default();

    state.set_search_query("ab");
    state.set_search_query("abb");
    assert!(state.search_pending());

    assert!(!state.set_search_results("ab", vec![result(1)]));
    assert!(state.search_results().is_empty());
    assert!(state.search_pending());

    assert!(state.set_search_results("abb", vec![result(2)]));
    assert_eq!(state.search_results()[0].thread_id(), 2);
    assert_eq!(state.search_results()[0].message_id(), NO_MESSAGE_ID);
    assert!(!state.search_pending());
}

#[test]
fn test_short_query_clears_results() {
    let mut state = AppState::default();
    state.set_search_query("ab");
    state.set_search_results("ab", vec![result(1)]);

    state.set_search_query("a");
    assert!(state.search_results().is_empty());
    assert!(!state.search_pending());

    assert!(!state.clear_search("ab"));
    assert!(state.clear_search("a"));
}
