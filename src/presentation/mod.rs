pub mod badge;
pub mod date;
pub mod sorter;

pub use badge::{BadgeTracker, compute_unread_count};
pub use date::format_date_or_time;
pub use sorter::{SortPolicy, sort_conversations};
