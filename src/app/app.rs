use eyre::{Context, Result};
use tokio::sync::mpsc;

use crate::models::{Action, Event, ListOrigin};

use super::app_state::AppState;

/// The interactive side. Owns the presentation state and only changes it
/// in response to events coming back from the background queue.
pub struct App {
    action_tx: mpsc::UnboundedSender<Action>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    state: AppState,
}

impl App {
    pub fn new(
        action_tx: mpsc::UnboundedSender<Action>,
        event_rx: mpsc::UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            action_tx,
            event_rx,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn load_conversations(&self) -> Result<()> {
        self.dispatch(Action::LoadConversations)
    }

    pub fn search(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.state.set_search_query(text.clone());
        self.dispatch(Action::Search(text))
    }

    pub fn set_read(&self, thread_id: i64, read: bool) -> Result<()> {
        self.dispatch(Action::SetRead { thread_id, read })
    }

    pub fn set_pinned(&self, thread_id: i64, pinned: bool) -> Result<()> {
        self.dispatch(Action::SetPinned { thread_id, pinned })
    }

    pub fn set_unread_at_top(&self, unread_at_top: bool) -> Result<()> {
        self.dispatch(Action::SetUnreadAtTop(unread_at_top))
    }

    fn dispatch(&self, action: Action) -> Result<()> {
        self.action_tx
            .send(action)
            .wrap_err("sending action to the background queue")
    }

    /// Consumes events until `done` holds for the state, the channel closes
    /// or a quit event arrives.
    pub async fn run_until<F>(&mut self, done: F) -> Result<()>
    where
        F: Fn(&AppState) -> bool,
    {
        while !done(&self.state) {
            let Some(event) = self.event_rx.recv().await else {
                eyre::bail!("event channel closed");
            };
            if self.handle_event(event) {
                break;
            }
        }
        Ok(())
    }

    /// Returns true when the app should stop.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::ConversationsLoaded(update) => {
                log::debug!(
                    "Showing {} conversations ({:?})",
                    update.conversations.len(),
                    update.origin
                );
                if let ListOrigin::Sync {
                    source_error: Some(reason),
                } = &update.origin
                {
                    log::warn!("Message store unavailable: {reason}");
                }
                self.state.set_conversations(update);
            }

            Event::BackfillCompleted { threads, messages } => {
                log::info!("History imported: {messages} messages in {threads} threads");
                self.state.set_backfill_completed();
            }

            Event::SearchResults { query, results } => {
                if !self.state.set_search_results(&query, results) {
                    log::trace!("Ignoring results of stale query {query:?}");
                }
            }

            Event::SearchCleared(query) => {
                self.state.clear_search(&query);
            }

            Event::Quit => return true,
        }
        false
    }
}
