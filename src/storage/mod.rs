pub mod sqlite;

use std::sync::Arc;

use crate::{
    config::StorageConfig,
    models::{Conversation, Message, Preferences},
};
use async_trait::async_trait;
use eyre::{Context, Result};
use sqlite::Sqlite;

/// The local conversation cache. Every call runs off the caller's task on
/// the store's own worker; callers decide how to degrade on failure.
#[async_trait]
pub trait Storage {
    async fn get_non_archived(&self) -> Result<Vec<Conversation>>;
    async fn get_all_archived(&self) -> Result<Vec<Conversation>>;
    async fn get_conversation(&self, thread_id: i64) -> Result<Option<Conversation>>;
    async fn insert_or_update_conversation(&self, conversation: Conversation) -> Result<()>;
    /// Removes the conversation row together with the messages filed under it.
    async fn delete_thread_id(&self, thread_id: i64) -> Result<()>;
    async fn set_read(&self, thread_id: i64, read: bool) -> Result<()>;
    async fn get_conversations_with_text(&self, pattern: &str) -> Result<Vec<Conversation>>;

    async fn get_messages_with_text(&self, pattern: &str) -> Result<Vec<Message>>;
    async fn get_thread_messages(&self, thread_id: i64) -> Result<Vec<Message>>;
    async fn get_scheduled_thread_messages(&self, thread_id: i64) -> Result<Vec<Message>>;
    async fn insert_messages(&self, messages: &[Message]) -> Result<()>;
    async fn delete_message(&self, id: i64) -> Result<()>;

    async fn load_preferences(&self) -> Result<Preferences>;
    async fn save_preferences(&self, preferences: &Preferences) -> Result<()>;
}

pub type ArcStorage = Arc<dyn Storage + Send + Sync>;

pub async fn new_storage(config: &StorageConfig) -> Result<ArcStorage> {
    let storage = match config {
        StorageConfig::Sqlite(sqlite_config) => {
            let sqlite = Sqlite::new(sqlite_config.path()).await?;
            sqlite.run_migration().await.wrap_err("migrating cache")?;
            Arc::new(sqlite)
        }
    };
    Ok(storage)
}

/// Bumps the launch counter and returns the updated preferences.
pub async fn record_app_launch(storage: &ArcStorage) -> Result<Preferences> {
    let mut preferences = storage
        .load_preferences()
        .await
        .wrap_err("loading preferences")?;
    preferences.app_run_count += 1;
    storage
        .save_preferences(&preferences)
        .await
        .wrap_err("saving preferences")?;
    Ok(preferences)
}
