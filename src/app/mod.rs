pub mod app;
pub mod app_state;
pub mod services;

pub use app::App;
pub use app_state::{AppState, ListStatus};
