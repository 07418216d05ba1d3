use crate::config::{
    SourceConfig, StorageConfig,
    constants::{BACKFILL_BATCH_SIZE, DATE_FORMAT, LOG_FILE_PATH, SCHEDULED_GRACE_MS},
};

use super::*;

#[test]
fn test_load_configuration() {
    let config = load_configuration("./testdata/config.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, true);

    let log = &config.log;
    assert_eq!(log.level.as_deref(), Some("debug"));
    let log_filters = log.filters.as_deref().unwrap_or_default();
    assert_eq!(log_filters.len(), 1);
    assert_eq!(log_filters[0].module.as_deref(), Some("threadcache::sync"));
    assert_eq!(log_filters[0].level.as_deref(), Some("trace"));

    let log_file = &log.file;
    assert_eq!(log_file.path, "/var/log/threadcache.log");
    assert_eq!(log_file.append, true);

    match &config.storage {
        StorageConfig::Sqlite(sqlite) => {
            assert_eq!(sqlite.path(), Some("/var/lib/threadcache/cache.db"));
        }
    }

    match &config.source {
        SourceConfig::Snapshot(snapshot) => {
            assert_eq!(snapshot.path(), Some("/var/lib/threadcache/export.json"));
        }
    }

    assert_eq!(config.sync.backfill_batch_size, 50);
    assert_eq!(config.sync.scheduled_grace_ms, 1000);
    assert_eq!(config.sync.timeout_secs, 10);

    assert_eq!(config.display.date_format, "%Y-%m-%d");
    assert_eq!(config.display.time_format, "%I:%M %p");
}

#[test]
fn test_load_configuration_with_some_default_fields() {
    let config =
        load_configuration("./testdata/config_with_default.toml").expect("failed to load config");

    assert_eq!(config.general.verbose, false);
    assert_eq!(config.log.level.as_deref(), Some("info"));
    assert_eq!(config.log.file.path, LOG_FILE_PATH);

    assert_eq!(config.sync.backfill_batch_size, BACKFILL_BATCH_SIZE);
    assert_eq!(config.sync.scheduled_grace_ms, SCHEDULED_GRACE_MS);
    assert_eq!(config.display.date_format, DATE_FORMAT);

    match &config.storage {
        StorageConfig::Sqlite(sqlite) => assert_eq!(sqlite.path(), Some("./cache.db")),
    }
    match &config.source {
        SourceConfig::Snapshot(snapshot) => assert_eq!(snapshot.path(), None),
    }
}

#[test]
fn test_load_configuration_missing_file() {
    let err = load_configuration("./testdata/does_not_exist.toml").unwrap_err();
    assert_eq!(err.to_string(), "reading ./testdata/does_not_exist.toml");
}

#[test]
fn test_resolve_path() {
    let ret = resolve_path("$TC_TEST_UNSET_ROOT/${TC_TEST_UNSET_DIR}/cache.db")
        .expect("failed to resolve path");
    assert_eq!(ret, "//cache.db");

    let dir = "/tmp/threadcache";
    let user_path = "user_path";
    unsafe {
        std::env::set_var("TC_TEST_ROOT", dir);
        std::env::set_var("TC_TEST_DIR", user_path);
    }
    let ret =
        resolve_path("$TC_TEST_ROOT/${TC_TEST_DIR}/cache.db").expect("failed to resolve path");
    assert_eq!(ret, format!("{dir}/{user_path}/cache.db"));
}

#[test]
fn test_basename() {
    assert_eq!(basename("src/sync/reconciler.rs"), "reconciler.rs");
    assert_eq!(basename("main.rs"), "main.rs");
}
