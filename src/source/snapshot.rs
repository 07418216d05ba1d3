#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;

use std::io::ErrorKind;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde::Deserialize;

use super::{ContactProvider, Source};
use crate::models::{Contact, ContactBook, Conversation, FetchError, Message};

/// A message store export on disk. The file is re-read on every fetch so a
/// fresh export is picked up by the next sync.
pub struct SnapshotSource {
    path: String,
}

#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    #[serde(default)]
    conversations: Vec<Conversation>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    contacts: Vec<Contact>,
}

impl SnapshotSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    async fn read(&self) -> Result<Snapshot, FetchError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => FetchError::Unavailable(format!("{} not found", self.path)),
                _ => FetchError::Query(format!("reading {}: {}", self.path, err)),
            })?;

        serde_json::from_str(&raw)
            .map_err(|err| FetchError::Malformed(format!("parsing {}: {}", self.path, err)))
    }
}

#[async_trait]
impl Source for SnapshotSource {
    async fn fetch_conversations(
        &self,
        contacts: &ContactBook,
    ) -> Result<Vec<Conversation>, FetchError> {
        let snapshot = self.read().await?;
        log::debug!(
            "Snapshot {} holds {} conversations",
            self.path,
            snapshot.conversations.len()
        );

        Ok(snapshot
            .conversations
            .into_iter()
            .map(|conversation| decorate(conversation, contacts))
            .collect())
    }

    async fn fetch_messages(
        &self,
        thread_id: i64,
        include_scheduled: bool,
    ) -> Result<Vec<Message>, FetchError> {
        let snapshot = self.read().await?;
        let mut messages = snapshot
            .messages
            .into_iter()
            .filter(|m| m.thread_id() == thread_id)
            .filter(|m| include_scheduled || !m.is_scheduled())
            .collect::<Vec<_>>();
        messages.sort_by_key(|m| (m.date(), m.id()));
        Ok(messages)
    }
}

#[async_trait]
impl ContactProvider for SnapshotSource {
    async fn load_contacts(&self) -> Result<ContactBook> {
        let snapshot = self
            .read()
            .await
            .wrap_err(format!("loading contacts from {}", self.path))?;
        Ok(ContactBook::from_contacts(snapshot.contacts))
    }
}

/// One-to-one threads take the contact's name and photo when the number is
/// known. Group threads keep what the store reported.
fn decorate(mut conversation: Conversation, contacts: &ContactBook) -> Conversation {
    if conversation.is_group_conversation() {
        return conversation;
    }

    if let Some(contact) = contacts.lookup(conversation.phone_number()) {
        if !contact.name.is_empty() {
            conversation.set_title(contact.name.clone());
        }
        if !contact.photo_uri.is_empty() {
            conversation.set_photo_uri(contact.photo_uri.clone());
        }
    }

    if conversation.title().is_empty() {
        let fallback = conversation.phone_number().to_string();
        conversation.set_title(fallback);
    }
    conversation
}
