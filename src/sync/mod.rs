pub mod expiry;
pub mod reconciler;

pub use expiry::clear_expired_scheduled_messages;
pub use reconciler::{BackfillReport, CachedConversations, ReconcileOutcome, Reconciler};
