pub mod action;
pub mod contact;
pub mod conversation;
pub mod error;
pub mod event;
pub mod message;
pub mod preferences;
pub mod search;

pub use action::Action;
pub use contact::{Contact, ContactBook};
pub use conversation::Conversation;
pub use error::{FetchError, MigrationConflict, StoreError, SyncIssue};
pub use event::{ArcEventTx, ConversationsUpdate, Event, EventTx, ListOrigin};
pub use message::{Message, Participant, PhoneNumber};
pub use preferences::Preferences;
pub use search::{ConversationResult, NO_MESSAGE_ID, OpenTarget, SearchMessageResult, SearchResult};
