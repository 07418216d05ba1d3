/// Messages written per transaction during the first-run history backfill
pub const BACKFILL_BATCH_SIZE: usize = 30;

/// Scheduled messages due within this window are treated as already expired
pub const SCHEDULED_GRACE_MS: i64 = 500;

/// Queries shorter than this clear the search results instead of running
pub const MIN_SEARCH_LENGTH: usize = 2;

pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub const TIME_FORMAT: &str = "%H:%M";

pub const LOG_FILE_PATH: &str = "/tmp/threadcache.log";

/// How long the CLI waits for a load or search to settle
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
