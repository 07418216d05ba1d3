#[cfg(test)]
#[path = "action_test.rs"]
mod tests;

use std::future::Future;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use eyre::{Context, Result};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    models::{Action, ArcEventTx, Conversation, ConversationsUpdate, Event, ListOrigin, Preferences},
    presentation::{BadgeTracker, SortPolicy, sort_conversations},
    search::{SearchEngine, SearchOutcome},
    storage::{ArcStorage, Storage},
    sync::Reconciler,
};

/// Background queue. Each action runs off the interactive context and its
/// outcome comes back as events.
pub struct ActionService {
    action_rx: mpsc::UnboundedReceiver<Action>,
    cancel_token: CancellationToken,
    pending_tasks: Arc<AtomicUsize>,
    worker: Worker,
}

#[derive(Clone)]
struct Worker {
    event_tx: ArcEventTx,
    storage: ArcStorage,
    reconciler: Arc<Reconciler>,
    search: Arc<SearchEngine>,
    badge: Arc<Mutex<BadgeTracker>>,
}

impl ActionService {
    pub fn new(
        storage: ArcStorage,
        reconciler: Arc<Reconciler>,
        search: Arc<SearchEngine>,
        action_rx: mpsc::UnboundedReceiver<Action>,
        event_tx: ArcEventTx,
        cancel_token: CancellationToken,
        pending_tasks: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            action_rx,
            cancel_token,
            pending_tasks,
            worker: Worker {
                event_tx,
                storage,
                reconciler,
                search,
                badge: Arc::new(Mutex::new(BadgeTracker::default())),
            },
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Action service cancelled");
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    let Some(action) = action else {
                        log::debug!("Action channel closed");
                        return Ok(());
                    };
                    self.worker.handle(action, &self.pending_tasks).await;
                }
            }
        }
    }
}

impl Worker {
    async fn handle(&self, action: Action, pending_tasks: &Arc<AtomicUsize>) {
        log::trace!("Handling {action:?}");
        let worker = self.clone();
        match action {
            Action::LoadConversations => {
                spawn(pending_tasks, async move { worker.load_conversations().await });
            }

            Action::Search(text) => {
                // Recorded before spawning so queries race on completion only.
                worker.search.issue(&text).await;
                spawn(pending_tasks, async move { worker.run_search(text).await });
            }

            Action::SetRead { thread_id, read } => {
                if let Err(err) = worker.set_read(thread_id, read).await {
                    log::error!("Failed to mark thread {thread_id} read={read}: {err:#}");
                }
            }

            Action::SetPinned { thread_id, pinned } => {
                let result = worker
                    .update_preferences(|preferences| {
                        if pinned {
                            preferences.pin(thread_id);
                        } else {
                            preferences.unpin(thread_id);
                        }
                    })
                    .await;
                if let Err(err) = result {
                    log::error!("Failed to update pin of thread {thread_id}: {err:#}");
                }
            }

            Action::SetUnreadAtTop(unread_at_top) => {
                let result = worker
                    .update_preferences(|preferences| preferences.unread_at_top = unread_at_top)
                    .await;
                if let Err(err) = result {
                    log::error!("Failed to update sort preference: {err:#}");
                }
            }
        }
    }

    async fn preferences(&self) -> Preferences {
        self.storage.load_preferences().await.unwrap_or_else(|err| {
            log::warn!("Using default preferences: {err:#}");
            Preferences::default()
        })
    }

    /// Cache first, then the reconciled list, then the one-time history
    /// import on the first launch.
    async fn load_conversations(&self) -> Result<()> {
        let preferences = self.preferences().await;
        let policy = SortPolicy::from_preferences(&preferences);
        let first_run = preferences.is_first_run();

        let cached = self.reconciler.load_cached().await;
        self.event_tx
            .send(Event::ConversationsLoaded(ConversationsUpdate {
                conversations: sort_conversations(cached.non_archived, &policy),
                origin: ListOrigin::Cache,
                first_run,
                unread_count: None,
            }))
            .await?;

        let now_ms = chrono::Utc::now().timestamp_millis();
        let outcome = self.reconciler.sync_cache(now_ms).await;
        for issue in &outcome.issues {
            log::warn!("Sync issue: {issue}");
        }

        let source_error = outcome.fetch_error();
        self.publish(
            outcome.conversations,
            &policy,
            ListOrigin::Sync { source_error },
            first_run,
        )
        .await?;

        if first_run && outcome.source_available {
            let report = self
                .reconciler
                .backfill(&outcome.authoritative_thread_ids)
                .await;
            self.event_tx
                .send(Event::BackfillCompleted {
                    threads: report.threads,
                    messages: report.messages,
                })
                .await?;
        }
        Ok(())
    }

    async fn run_search(&self, text: String) -> Result<()> {
        match self.search.complete(&text).await {
            SearchOutcome::Cleared => self.event_tx.send(Event::SearchCleared(text)).await?,
            SearchOutcome::Results(results) => {
                self.event_tx
                    .send(Event::SearchResults {
                        query: text,
                        results,
                    })
                    .await?
            }
            SearchOutcome::Superseded => {}
        }
        Ok(())
    }

    async fn set_read(&self, thread_id: i64, read: bool) -> Result<()> {
        self.storage
            .set_read(thread_id, read)
            .await
            .wrap_err("updating read state")?;
        self.refresh().await
    }

    async fn update_preferences<F>(&self, update: F) -> Result<()>
    where
        F: FnOnce(&mut Preferences),
    {
        let mut preferences = self
            .storage
            .load_preferences()
            .await
            .wrap_err("loading preferences")?;
        update(&mut preferences);
        self.storage
            .save_preferences(&preferences)
            .await
            .wrap_err("saving preferences")?;
        self.refresh().await
    }

    /// Re-publishes the cached list after a local change.
    async fn refresh(&self) -> Result<()> {
        let preferences = self.preferences().await;
        let policy = SortPolicy::from_preferences(&preferences);
        let conversations = self.reconciler.load_cached().await.non_archived;
        self.publish(conversations, &policy, ListOrigin::Local, false)
            .await
    }

    async fn publish(
        &self,
        conversations: Vec<Conversation>,
        policy: &SortPolicy,
        origin: ListOrigin,
        first_run: bool,
    ) -> Result<()> {
        let unread_count = self.badge.lock().await.update(&conversations);

        self.event_tx
            .send(Event::ConversationsLoaded(ConversationsUpdate {
                conversations: sort_conversations(conversations, policy),
                origin,
                first_run,
                unread_count,
            }))
            .await?;
        Ok(())
    }
}

fn spawn<F>(pending_tasks: &Arc<AtomicUsize>, task: F)
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    let pending_tasks = Arc::clone(pending_tasks);
    pending_tasks.fetch_add(1, Ordering::SeqCst);
    tokio::spawn(async move {
        if let Err(err) = task.await {
            log::error!("Background task failed: {err:#}");
        }
        pending_tasks.fetch_sub(1, Ordering::SeqCst);
    });
}
