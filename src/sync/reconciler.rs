#[cfg(test)]
#[path = "reconciler_test.rs"]
mod tests;

use std::collections::{HashMap, HashSet};

use eyre::Result;
use tokio::sync::Mutex;

use super::expiry::clear_expired_scheduled_messages;
use crate::{
    config::constants::{BACKFILL_BATCH_SIZE, SCHEDULED_GRACE_MS},
    models::{ContactBook, Conversation, MigrationConflict, StoreError, SyncIssue},
    source::{ArcContactProvider, ArcSource},
    storage::{ArcStorage, Storage},
};

/// Snapshot of the cache taken before a sync.
#[derive(Debug, Default, Clone)]
pub struct CachedConversations {
    pub non_archived: Vec<Conversation>,
    pub archived: Vec<Conversation>,
}

impl CachedConversations {
    pub fn is_empty(&self) -> bool {
        self.non_archived.is_empty() && self.archived.is_empty()
    }

    pub fn into_all(self) -> Vec<Conversation> {
        let mut all = self.non_archived;
        all.extend(self.archived);
        all
    }
}

#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Non-archived conversations as persisted after the sync.
    pub conversations: Vec<Conversation>,
    pub authoritative_thread_ids: Vec<i64>,
    pub issues: Vec<SyncIssue>,
    pub source_available: bool,
}

impl ReconcileOutcome {
    /// Why the message store could not be read, if it could not.
    pub fn fetch_error(&self) -> Option<String> {
        if self.source_available {
            return None;
        }
        let reason = self
            .issues
            .iter()
            .find_map(|issue| match issue {
                SyncIssue::Fetch(err) => Some(err.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "message store unavailable".to_string());
        Some(reason)
    }
}

#[derive(Debug, Default)]
pub struct BackfillReport {
    pub threads: usize,
    pub messages: usize,
    pub issues: Vec<SyncIssue>,
}

/// Brings the cache in line with the message store. Every mutating entry
/// point takes the same lock, so a second sync queues behind the first.
pub struct Reconciler {
    storage: ArcStorage,
    source: ArcSource,
    contacts: ArcContactProvider,
    lock: Mutex<()>,
    backfill_batch_size: usize,
    scheduled_grace_ms: i64,
}

impl Reconciler {
    pub fn new(storage: ArcStorage, source: ArcSource, contacts: ArcContactProvider) -> Self {
        Self {
            storage,
            source,
            contacts,
            lock: Mutex::new(()),
            backfill_batch_size: BACKFILL_BATCH_SIZE,
            scheduled_grace_ms: SCHEDULED_GRACE_MS,
        }
    }

    pub fn with_backfill_batch_size(mut self, size: usize) -> Self {
        self.backfill_batch_size = size.max(1);
        self
    }

    pub fn with_scheduled_grace_ms(mut self, grace_ms: i64) -> Self {
        self.scheduled_grace_ms = grace_ms;
        self
    }

    pub fn storage(&self) -> &ArcStorage {
        &self.storage
    }

    /// Fast path read of the cache. A failing read shows up as an empty list.
    pub async fn load_cached(&self) -> CachedConversations {
        let non_archived = self.storage.get_non_archived().await.unwrap_or_else(|err| {
            log::warn!("Failed to read cached conversations: {err:#}");
            vec![]
        });
        let archived = self.storage.get_all_archived().await.unwrap_or_else(|err| {
            log::warn!("Failed to read archived conversations: {err:#}");
            vec![]
        });
        CachedConversations {
            non_archived,
            archived,
        }
    }

    /// Removes scheduled messages that are already due and drops provisional
    /// threads left without any. Returns the ids of the removed threads.
    pub async fn clear_expired(&self, conversations: &[Conversation], now_ms: i64) -> Vec<i64> {
        let _guard = self.lock.lock().await;
        self.expire_scheduled(conversations, now_ms).await
    }

    /// Fetches the authoritative set and applies it to the cache. A failed
    /// fetch leaves the cache untouched and is reported in the outcome.
    pub async fn sync(&self, cached: Vec<Conversation>) -> ReconcileOutcome {
        let _guard = self.lock.lock().await;
        self.apply(cached).await
    }

    /// One full cycle under a single hold of the lock: re-read the cache,
    /// drop expired scheduled threads, then sync. A queued cycle sees what
    /// the one before it wrote.
    pub async fn sync_cache(&self, now_ms: i64) -> ReconcileOutcome {
        let _guard = self.lock.lock().await;

        let cached = self.load_cached().await;
        let removed = self.expire_scheduled(&cached.non_archived, now_ms).await;
        let remaining = cached
            .into_all()
            .into_iter()
            .filter(|c| !removed.contains(&c.thread_id()))
            .collect();

        self.apply(remaining).await
    }

    async fn expire_scheduled(&self, conversations: &[Conversation], now_ms: i64) -> Vec<i64> {
        let mut removed = vec![];
        for conversation in conversations {
            let thread_id = conversation.thread_id();
            match clear_expired_scheduled_messages(
                &self.storage,
                thread_id,
                now_ms,
                self.scheduled_grace_ms,
            )
            .await
            {
                Ok(true) => removed.push(thread_id),
                Ok(false) => {}
                Err(err) => log::warn!("Failed to clear scheduled messages of {thread_id}: {err:#}"),
            }
        }
        removed
    }

    async fn apply(&self, cached: Vec<Conversation>) -> ReconcileOutcome {
        let contacts = self.contacts.load_contacts().await.unwrap_or_else(|err| {
            log::warn!("Contacts unavailable, titles fall back to numbers: {err:#}");
            ContactBook::default()
        });

        let mut outcome = ReconcileOutcome::default();
        let authoritative = match self.source.fetch_conversations(&contacts).await {
            Ok(conversations) => conversations,
            Err(err) => {
                log::warn!("Keeping cached conversations: {err}");
                outcome.conversations = self.read_non_archived(&mut outcome.issues).await;
                outcome.issues.push(err.into());
                return outcome;
            }
        };

        log::debug!(
            "Reconciling {} cached against {} authoritative conversations",
            cached.len(),
            authoritative.len()
        );
        self.reconcile(cached, &authoritative, &mut outcome.issues)
            .await;

        outcome.conversations = self.read_non_archived(&mut outcome.issues).await;
        outcome.authoritative_thread_ids = authoritative.iter().map(|c| c.thread_id()).collect();
        outcome.source_available = true;
        outcome
    }

    /// Copies the message history of `thread_ids` into the cache, written in
    /// batches. Threads whose history cannot be read are skipped.
    pub async fn backfill(&self, thread_ids: &[i64]) -> BackfillReport {
        let _guard = self.lock.lock().await;
        let mut report = BackfillReport::default();

        for &thread_id in thread_ids {
            let messages = match self.source.fetch_messages(thread_id, false).await {
                Ok(messages) => messages,
                Err(err) => {
                    log::warn!("Skipping history of thread {thread_id}: {err}");
                    report.issues.push(err.into());
                    continue;
                }
            };

            for batch in messages.chunks(self.backfill_batch_size) {
                let result = self.storage.insert_messages(batch).await;
                if absorb(&mut report.issues, "backfill", result) {
                    report.messages += batch.len();
                }
            }
            report.threads += 1;
        }

        log::info!(
            "Backfilled {} messages from {} threads",
            report.messages,
            report.threads
        );
        report
    }

    async fn reconcile(
        &self,
        mut working: Vec<Conversation>,
        authoritative: &[Conversation],
        issues: &mut Vec<SyncIssue>,
    ) {
        let cached_ids = working.iter().map(|c| c.thread_id()).collect::<HashSet<_>>();
        let by_id = authoritative
            .iter()
            .map(|c| (c.thread_id(), c))
            .collect::<HashMap<_, _>>();

        for conversation in authoritative {
            if cached_ids.contains(&conversation.thread_id()) {
                continue;
            }
            let result = self
                .storage
                .insert_or_update_conversation(conversation.clone())
                .await;
            absorb(issues, "insert", result);
            working.push(conversation.clone());
        }

        for conversation in &working {
            let thread_id = conversation.thread_id();
            if by_id.contains_key(&thread_id) || conversation.is_scheduled() {
                continue;
            }
            log::debug!("Thread {thread_id} is gone from the message store");
            let result = self.storage.delete_thread_id(thread_id).await;
            absorb(issues, "delete", result);
        }

        self.migrate_provisional(&working, authoritative, issues)
            .await;

        for cached in &working {
            let Some(current) = by_id.get(&cached.thread_id()) else {
                continue;
            };
            if cached.same_contents(current) {
                continue;
            }
            let merged = Conversation::merged_with(cached, current);
            let result = self.storage.insert_or_update_conversation(merged).await;
            absorb(issues, "update", result);
        }
    }

    async fn migrate_provisional(
        &self,
        working: &[Conversation],
        authoritative: &[Conversation],
        issues: &mut Vec<SyncIssue>,
    ) {
        let mut candidates: HashMap<i64, Vec<&Conversation>> = HashMap::new();
        for provisional in working.iter().filter(|c| c.is_scheduled()) {
            let address = provisional.normalized_phone_number();
            if address.is_empty() {
                continue;
            }
            let target = authoritative.iter().find(|c| {
                c.thread_id() != provisional.thread_id() && c.normalized_phone_number() == address
            });
            if let Some(target) = target {
                candidates
                    .entry(target.thread_id())
                    .or_default()
                    .push(provisional);
            }
        }

        for target in authoritative {
            let Some(mut provisionals) = candidates.remove(&target.thread_id()) else {
                continue;
            };
            provisionals.sort_by_key(|c| std::cmp::Reverse(c.date()));

            let chosen = provisionals[0];
            if provisionals.len() > 1 {
                let conflict = MigrationConflict {
                    phone_number: target.phone_number().to_string(),
                    migrated: chosen.thread_id(),
                    left: provisionals[1..].iter().map(|c| c.thread_id()).collect(),
                };
                log::warn!("{conflict}");
                issues.push(conflict.into());
            }

            let cached_target = working.iter().find(|c| c.thread_id() == target.thread_id());
            let resolved = match cached_target {
                Some(cached) => Conversation::merged_with(cached, target),
                None => target.clone(),
            };
            if let Err(err) = self.migrate(chosen.thread_id(), resolved).await {
                log::warn!("Failed to migrate thread {}: {err:#}", chosen.thread_id());
                issues.push(StoreError::new("migration", &err).into());
            }
        }
    }

    /// Moves the messages of `provisional_id` under `target`, then replaces
    /// the provisional row with the real conversation.
    async fn migrate(&self, provisional_id: i64, target: Conversation) -> Result<()> {
        let target_id = target.thread_id();
        let moved = self
            .storage
            .get_thread_messages(provisional_id)
            .await?
            .into_iter()
            .map(|message| message.with_thread_id(target_id))
            .collect::<Vec<_>>();

        self.storage.insert_messages(&moved).await?;
        self.storage.delete_thread_id(provisional_id).await?;
        self.storage.insert_or_update_conversation(target).await?;

        log::info!(
            "Migrated {} messages from provisional thread {provisional_id} to {target_id}",
            moved.len()
        );
        Ok(())
    }

    async fn read_non_archived(&self, issues: &mut Vec<SyncIssue>) -> Vec<Conversation> {
        match self.storage.get_non_archived().await {
            Ok(conversations) => conversations,
            Err(err) => {
                log::warn!("Failed to re-read conversations: {err:#}");
                issues.push(StoreError::new("read", &err).into());
                vec![]
            }
        }
    }
}

fn absorb(issues: &mut Vec<SyncIssue>, operation: &'static str, result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Cache {operation} failed: {err:#}");
            issues.push(StoreError::new(operation, &err).into());
            false
        }
    }
}
