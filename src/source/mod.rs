pub mod snapshot;

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::{
    config::SourceConfig,
    models::{ContactBook, Conversation, FetchError, Message},
};
use async_trait::async_trait;
use eyre::Result;
use snapshot::SnapshotSource;

/// Read-only view of the authoritative message store.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Source {
    /// Current set of threads, decorated with `contacts`. An `Err` means the
    /// store could not be read, which is not the same as an empty store.
    async fn fetch_conversations(
        &self,
        contacts: &ContactBook,
    ) -> Result<Vec<Conversation>, FetchError>;

    async fn fetch_messages(
        &self,
        thread_id: i64,
        include_scheduled: bool,
    ) -> Result<Vec<Message>, FetchError>;
}

/// Supplies resolved contacts used to title conversations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContactProvider {
    async fn load_contacts(&self) -> Result<ContactBook>;
}

pub type ArcSource = Arc<dyn Source + Send + Sync>;
pub type ArcContactProvider = Arc<dyn ContactProvider + Send + Sync>;

pub fn new_source(config: &SourceConfig) -> Result<(ArcSource, ArcContactProvider)> {
    match config {
        SourceConfig::Snapshot(snapshot) => {
            let path = match snapshot.path() {
                Some(path) => path,
                None => eyre::bail!("snapshot source requires a path"),
            };
            let source = Arc::new(SnapshotSource::new(path));
            Ok((source.clone(), source))
        }
    }
}
