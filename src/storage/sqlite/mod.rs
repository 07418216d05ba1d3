pub(crate) mod migration;

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use eyre::{Context, Result};
use tokio_rusqlite::{Connection, params, params_from_iter, types::Value};

use crate::{
    models::{Conversation, Message, Participant, Preferences},
    storage::Storage,
};

const CONVERSATION_COLUMNS: &str = "thread_id, phone_number, title, photo_uri, snippet, date, \
    read, is_group_conversation, is_scheduled, is_archived";

const MESSAGE_COLUMNS: &str = "id, thread_id, body, date, read, sender_name, sender_photo_uri, \
    participants, is_scheduled";

const PINNED_CONVERSATIONS: &str = "pinned_conversations";
const UNREAD_AT_TOP: &str = "unread_at_top";
const APP_RUN_COUNT: &str = "app_run_count";

pub struct Sqlite {
    conn: Connection,
}

impl Sqlite {
    pub async fn new(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(path) => Connection::open(path)
                .await
                .wrap_err(format!("opening database path: {}", path))?,
            None => Connection::open_in_memory()
                .await
                .wrap_err("opening in-memory database")?,
        };

        Ok(Self { conn })
    }

    pub async fn run_migration(&self) -> Result<()> {
        self.conn
            .call(|conn| Ok(conn.execute_batch(migration::MIGRATION)?))
            .await
            .wrap_err("executing migration")?;
        Ok(())
    }

    async fn select_conversations(
        &self,
        query: String,
        args: Vec<Value>,
    ) -> Result<Vec<Conversation>> {
        let conversations = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&query)?;
                let rows = stmt.query_map(params_from_iter(args), |row| {
                    Ok(Conversation::new(row.get(0)?)
                        .with_phone_number(row.get::<_, String>(1)?)
                        .with_title(row.get::<_, String>(2)?)
                        .with_photo_uri(row.get::<_, String>(3)?)
                        .with_snippet(row.get::<_, String>(4)?)
                        .with_date(row.get(5)?)
                        .with_read(row.get(6)?)
                        .with_group(row.get(7)?)
                        .with_scheduled(row.get(8)?)
                        .with_archived(row.get(9)?))
                })?;

                let mut conversations = vec![];
                for row in rows {
                    conversations.push(row?);
                }
                Ok(conversations)
            })
            .await?;
        Ok(conversations)
    }

    async fn select_messages(&self, query: String, args: Vec<Value>) -> Result<Vec<Message>> {
        let messages = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&query)?;
                let rows = stmt.query_map(params_from_iter(args), |row| {
                    let message = Message::new(row.get(0)?, row.get(1)?, row.get::<_, String>(2)?)
                        .with_date(row.get(3)?)
                        .with_read(row.get(4)?)
                        .with_sender_name(row.get::<_, String>(5)?)
                        .with_sender_photo_uri(row.get::<_, String>(6)?)
                        .with_scheduled(row.get(8)?);
                    let participants: String = row.get(7)?;
                    Ok((message, participants))
                })?;

                let mut messages = vec![];
                for row in rows {
                    let (message, participants) = row?;
                    let participants: Vec<Participant> = serde_json::from_str(&participants)
                        .map_err(|err| tokio_rusqlite::Error::Other(Box::new(err)))?;
                    messages.push(message.with_participants(participants));
                }
                Ok(messages)
            })
            .await?;
        Ok(messages)
    }
}

#[async_trait]
impl Storage for Sqlite {
    async fn get_non_archived(&self) -> Result<Vec<Conversation>> {
        self.select_conversations(
            format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE is_archived = 0 ORDER BY date DESC"
            ),
            vec![],
        )
        .await
        .wrap_err("selecting non-archived conversations")
    }

    async fn get_all_archived(&self) -> Result<Vec<Conversation>> {
        self.select_conversations(
            format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE is_archived = 1 ORDER BY date DESC"
            ),
            vec![],
        )
        .await
        .wrap_err("selecting archived conversations")
    }

    async fn get_conversation(&self, thread_id: i64) -> Result<Option<Conversation>> {
        let conversations = self
            .select_conversations(
                format!("SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE thread_id = ?1"),
                vec![Value::Integer(thread_id)],
            )
            .await
            .wrap_err(format!("selecting conversation {thread_id}"))?;
        Ok(conversations.into_iter().next())
    }

    async fn insert_or_update_conversation(&self, conversation: Conversation) -> Result<()> {
        let thread_id = conversation.thread_id();
        self.conn
            .call(move |conn| {
                conn.execute(
                    &format!(
                        "INSERT OR REPLACE INTO conversations ({CONVERSATION_COLUMNS}) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                    ),
                    params![
                        conversation.thread_id(),
                        conversation.phone_number(),
                        conversation.title(),
                        conversation.photo_uri(),
                        conversation.snippet(),
                        conversation.date(),
                        conversation.read(),
                        conversation.is_group_conversation(),
                        conversation.is_scheduled(),
                        conversation.is_archived(),
                    ],
                )?;
                Ok(())
            })
            .await
            .wrap_err(format!("upserting conversation {thread_id}"))?;
        Ok(())
    }

    async fn delete_thread_id(&self, thread_id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM conversations WHERE thread_id = ?1",
                    params![thread_id],
                )?;
                tx.execute("DELETE FROM messages WHERE thread_id = ?1", params![thread_id])?;
                Ok(tx.commit()?)
            })
            .await
            .wrap_err(format!("deleting thread {thread_id}"))?;
        Ok(())
    }

    async fn set_read(&self, thread_id: i64, read: bool) -> Result<()> {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "UPDATE conversations SET read = ?1 WHERE thread_id = ?2",
                    params![read, thread_id],
                )?;
                tx.execute(
                    "UPDATE messages SET read = ?1 WHERE thread_id = ?2",
                    params![read, thread_id],
                )?;
                Ok(tx.commit()?)
            })
            .await
            .wrap_err(format!("marking thread {thread_id} read={read}"))?;
        Ok(())
    }

    async fn get_conversations_with_text(&self, pattern: &str) -> Result<Vec<Conversation>> {
        self.select_conversations(
            format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations \
                 WHERE title LIKE ?1 OR phone_number LIKE ?1 ORDER BY date DESC"
            ),
            vec![Value::Text(pattern.to_string())],
        )
        .await
        .wrap_err("searching conversations")
    }

    async fn get_messages_with_text(&self, pattern: &str) -> Result<Vec<Message>> {
        self.select_messages(
            format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE body LIKE ?1"),
            vec![Value::Text(pattern.to_string())],
        )
        .await
        .wrap_err("searching messages")
    }

    async fn get_thread_messages(&self, thread_id: i64) -> Result<Vec<Message>> {
        self.select_messages(
            format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE thread_id = ?1 ORDER BY date, id"),
            vec![Value::Integer(thread_id)],
        )
        .await
        .wrap_err(format!("selecting messages of thread {thread_id}"))
    }

    async fn get_scheduled_thread_messages(&self, thread_id: i64) -> Result<Vec<Message>> {
        self.select_messages(
            format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages \
                 WHERE thread_id = ?1 AND is_scheduled = 1 ORDER BY date, id"
            ),
            vec![Value::Integer(thread_id)],
        )
        .await
        .wrap_err(format!("selecting scheduled messages of thread {thread_id}"))
    }

    async fn insert_messages(&self, messages: &[Message]) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }

        let mut rows = Vec::with_capacity(messages.len());
        for message in messages {
            let participants = serde_json::to_string(message.participants())
                .wrap_err(format!("encoding participants of message {}", message.id()))?;
            rows.push((message.clone(), participants));
        }

        let count = rows.len();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(&format!(
                        "INSERT OR REPLACE INTO messages ({MESSAGE_COLUMNS}) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                    ))?;
                    for (message, participants) in &rows {
                        stmt.execute(params![
                            message.id(),
                            message.thread_id(),
                            message.body(),
                            message.date(),
                            message.read(),
                            message.sender_name(),
                            message.sender_photo_uri(),
                            participants,
                            message.is_scheduled(),
                        ])?;
                    }
                }
                Ok(tx.commit()?)
            })
            .await
            .wrap_err(format!("inserting {count} messages"))?;
        Ok(())
    }

    async fn delete_message(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM messages WHERE id = ?1", params![id])?;
                Ok(())
            })
            .await
            .wrap_err(format!("deleting message {id}"))?;
        Ok(())
    }

    async fn load_preferences(&self) -> Result<Preferences> {
        let values = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT key, value FROM preferences")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut values = HashMap::new();
                for row in rows {
                    let (key, value) = row?;
                    values.insert(key, value);
                }
                Ok(values)
            })
            .await
            .wrap_err("selecting preferences")?;

        let mut preferences = Preferences::default();
        if let Some(pinned) = values.get(PINNED_CONVERSATIONS) {
            preferences.pinned_conversations = serde_json::from_str::<BTreeSet<String>>(pinned)
                .wrap_err("decoding pinned conversations")?;
        }
        if let Some(unread_at_top) = values.get(UNREAD_AT_TOP) {
            preferences.unread_at_top = unread_at_top
                .parse()
                .wrap_err(format!("decoding {UNREAD_AT_TOP}"))?;
        }
        if let Some(app_run_count) = values.get(APP_RUN_COUNT) {
            preferences.app_run_count = app_run_count
                .parse()
                .wrap_err(format!("decoding {APP_RUN_COUNT}"))?;
        }
        Ok(preferences)
    }

    async fn save_preferences(&self, preferences: &Preferences) -> Result<()> {
        let values = vec![
            (
                PINNED_CONVERSATIONS,
                serde_json::to_string(&preferences.pinned_conversations)
                    .wrap_err("encoding pinned conversations")?,
            ),
            (UNREAD_AT_TOP, preferences.unread_at_top.to_string()),
            (APP_RUN_COUNT, preferences.app_run_count.to_string()),
        ];

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (key, value) in &values {
                    tx.execute(
                        "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
                        params![key, value],
                    )?;
                }
                Ok(tx.commit()?)
            })
            .await
            .wrap_err("saving preferences")?;
        Ok(())
    }
}
