use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn backfill_batch_size() -> usize {
    BACKFILL_BATCH_SIZE
}

pub(crate) fn scheduled_grace_ms() -> i64 {
    SCHEDULED_GRACE_MS
}

pub(crate) fn timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn date_format() -> String {
    DATE_FORMAT.to_string()
}

pub(crate) fn time_format() -> String {
    TIME_FORMAT.to_string()
}
