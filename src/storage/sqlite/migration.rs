pub(crate) const MIGRATION: &str = r#"
    CREATE TABLE IF NOT EXISTS conversations (
        thread_id INTEGER PRIMARY KEY,
        phone_number TEXT NOT NULL,
        title TEXT NOT NULL,
        photo_uri TEXT NOT NULL,
        snippet TEXT NOT NULL,
        date INTEGER NOT NULL,
        read INTEGER NOT NULL,
        is_group_conversation INTEGER NOT NULL,
        is_scheduled INTEGER NOT NULL,
        is_archived INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS conversations_archived ON conversations(is_archived);

    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY,
        thread_id INTEGER NOT NULL,
        body TEXT NOT NULL,
        date INTEGER NOT NULL,
        read INTEGER NOT NULL,
        sender_name TEXT NOT NULL,
        sender_photo_uri TEXT NOT NULL,
        participants TEXT NOT NULL,
        is_scheduled INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS messages_thread_id ON messages(thread_id);

    CREATE TABLE IF NOT EXISTS preferences (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;
