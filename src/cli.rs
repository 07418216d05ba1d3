use clap::Parser;
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};
use crate::models::Preferences;

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"Keeps a local conversation cache in sync with a message store export

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/threadcache/config.toml
    * $HOME/.config/threadcache/config.toml
    * $HOME/.threadcache.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    /// Search the cache once it is in sync
    #[arg(short, long, value_name = "TEXT")]
    search: Option<String>,

    /// Keep unread conversations at the top of the list
    #[arg(long, value_name = "BOOL")]
    unread_at_top: Option<bool>,

    /// Pin a conversation by thread id
    #[arg(long, value_name = "THREAD_ID")]
    pin: Vec<i64>,

    /// Unpin a conversation by thread id
    #[arg(long, value_name = "THREAD_ID")]
    unpin: Vec<i64>,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        if config_path.is_empty() {
            // No config path is specified just use the default config
            return Ok(Configuration::default());
        }
        Ok(load_configuration(config_path.as_str()).wrap_err("loading configuration")?)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Applies the preference flags. Returns true when anything changed.
    pub fn apply_preferences(&self, preferences: &mut Preferences) -> bool {
        let before = preferences.clone();
        if let Some(unread_at_top) = self.unread_at_top {
            preferences.unread_at_top = unread_at_top;
        }
        for &thread_id in &self.pin {
            preferences.pin(thread_id);
        }
        for &thread_id in &self.unpin {
            preferences.unpin(thread_id);
        }
        *preferences != before
    }
}
