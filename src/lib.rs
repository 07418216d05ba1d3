pub mod app;
pub mod cli;
pub mod config;
pub mod models;
pub mod presentation;
pub mod search;
pub mod source;
pub mod storage;
pub mod sync;

pub use cli::Command;
pub use config::{init_logger, load_configuration, resolve_path};
