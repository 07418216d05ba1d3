use super::*;

#[test]
fn test_normalize_phone_number() {
    assert_eq!(normalize_phone_number("+1 (555) 123-0000"), "+15551230000");
    assert_eq!(normalize_phone_number(" 555.123.0000 "), "5551230000");
    assert_eq!(normalize_phone_number("+"), "");
    assert_eq!(normalize_phone_number("abc"), "");
}

#[test]
fn test_normalize_address() {
    assert_eq!(
        normalize_address("+1 555 123 0000; 555-999"),
        "+15551230000,555999"
    );
    assert_eq!(normalize_address("+15551230000"), "+15551230000");
    assert_eq!(normalize_address(" , "), "");
}

#[test]
fn test_same_contents_ignores_local_flags() {
    let a = Conversation::new(1)
        .with_title("Abby")
        .with_date(10)
        .with_archived(true);
    let b = Conversation::new(1).with_title("Abby").with_date(10);
    assert_eq!(a.same_contents(&b), true);

    let c = b.clone().with_read(false);
    assert_eq!(a.same_contents(&c), true);

    let d = b.clone().with_snippet("new message");
    assert_eq!(a.same_contents(&d), false);
}

#[test]
fn test_merged_with_keeps_latest_date() {
    let cached = Conversation::new(42)
        .with_title("Old title")
        .with_date(200)
        .with_archived(true);
    let authoritative = Conversation::new(42).with_title("New title").with_date(150);

    let merged = Conversation::merged_with(&cached, &authoritative);
    assert_eq!(merged.title(), "New title");
    assert_eq!(merged.date(), 200);
    assert_eq!(merged.is_archived(), true);

    let newer = authoritative.clone().with_date(300);
    let merged = Conversation::merged_with(&cached, &newer);
    assert_eq!(merged.date(), 300);
}

#[test]
fn test_merged_with_keeps_read_toggle_until_new_activity() {
    let cached = Conversation::new(5).with_date(100).with_read(true);
    let authoritative = Conversation::new(5)
        .with_title("Renamed")
        .with_date(100)
        .with_read(false);

    let merged = Conversation::merged_with(&cached, &authoritative);
    assert_eq!(merged.title(), "Renamed");
    assert_eq!(merged.read(), true);

    let newer = authoritative.clone().with_date(150);
    let merged = Conversation::merged_with(&cached, &newer);
    assert_eq!(merged.read(), false);
}
