use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time;

use chrono::Local;
use eyre::{Context, Result};
use threadcache::app::services::{ActionService, ShutdownCoordinator};
use threadcache::app::{App, AppState, ListStatus};
use threadcache::cli::Command;
use threadcache::config::{Configuration, DisplayConfig, init_logger, verbose};
use threadcache::models::{Action, Event};
use threadcache::presentation::format_date_or_time;
use threadcache::search::SearchEngine;
use threadcache::source::new_source;
use threadcache::storage::{Storage, new_storage, record_app_launch};
use threadcache::sync::Reconciler;
use tokio::{sync::mpsc, task};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    Configuration::init(config.clone())?;
    init_logger(&config.log)?;
    verbose!("[+] Logger initialized");

    verbose!("[+] Initializing storage...");
    let storage = new_storage(&config.storage)
        .await
        .wrap_err("initializing storage")?;
    let mut preferences = record_app_launch(&storage)
        .await
        .wrap_err("recording launch")?;
    verbose!("[+] Storage initialized, launch #{}", preferences.app_run_count);

    if cmd.apply_preferences(&mut preferences) {
        storage
            .save_preferences(&preferences)
            .await
            .wrap_err("saving preferences")?;
        verbose!("[+] Preferences updated");
    }

    let (source, contacts) = new_source(&config.source).wrap_err("initializing source")?;
    let reconciler = Arc::new(
        Reconciler::new(storage.clone(), source, contacts)
            .with_backfill_batch_size(config.sync.backfill_batch_size)
            .with_scheduled_grace_ms(config.sync.scheduled_grace_ms),
    );
    let search = Arc::new(SearchEngine::new(storage.clone(), config.display.clone()));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let (action_tx, action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut task_set = task::JoinSet::new();
    let token = CancellationToken::new();
    let pending_tasks = Arc::new(AtomicUsize::new(0));

    let mut action_service = ActionService::new(
        storage.clone(),
        reconciler,
        search,
        action_rx,
        Arc::new(event_tx),
        token.clone(),
        pending_tasks.clone(),
    );
    task_set.spawn(async move { action_service.run().await });

    let timeout = time::Duration::from_secs(config.sync.timeout_secs);
    let mut app = App::new(action_tx, event_rx);

    verbose!("[+] Loading conversations...");
    app.load_conversations()?;
    match tokio::time::timeout(
        timeout,
        app.run_until(|state| state.synced() && !state.backfill_pending()),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => eprintln!("Timed out waiting for the message store"),
    }
    print_conversations(app.state(), &config.display);

    if let Some(text) = cmd.search() {
        app.search(text)?;
        match tokio::time::timeout(timeout, app.run_until(|state| !state.search_pending())).await
        {
            Ok(result) => result?,
            Err(_) => eprintln!("Timed out waiting for search results"),
        }
        print_search_results(app.state());
    }

    token.cancel();
    let coordinator = ShutdownCoordinator {
        pending_tasks: pending_tasks.clone(),
        shutdown_complete: shutdown_tx,
        timeout: None,
    };
    task_set.spawn(coordinator.wait_for_completion());

    match tokio::time::timeout(time::Duration::from_secs(15), shutdown_rx).await {
        Ok(Ok(Ok(_))) => {}
        Ok(Ok(Err(e))) => eprintln!("Shutdown error: {}", e),
        Ok(Err(e)) => eprintln!("Shutdown error: {}", e),
        Err(_) => eprintln!("Shutdown timeout reached"),
    }

    task_set.abort_all();
    while let Some(res) = task_set.join_next().await {
        match res {
            Ok(_) => {}
            Err(err) if err.is_cancelled() => {}
            Err(err) => log::error!("Task error: {}", err),
        }
    }

    Ok(())
}

fn print_conversations(state: &AppState, display: &DisplayConfig) {
    if let Some(reason) = state.source_error() {
        eprintln!("Message store unavailable, showing cached conversations: {reason}");
    }

    match state.status() {
        ListStatus::Loading => println!("Loading conversations..."),
        ListStatus::Empty => println!("No conversations"),
        ListStatus::Ready => {
            let now = Local::now();
            for conversation in state.conversations() {
                println!(
                    "{}{:>6}  {:<24} {:>10}  {}",
                    if conversation.read() { " " } else { "*" },
                    conversation.thread_id(),
                    conversation.title(),
                    format_date_or_time(conversation.date(), now, display),
                    conversation.snippet(),
                );
            }
        }
    }
    println!("Unread: {}", state.unread_count());
}

fn print_search_results(state: &AppState) {
    if state.search_results().is_empty() {
        println!("No results for {:?}", state.search_query());
        return;
    }
    for result in state.search_results() {
        let target = result.target();
        let message = target
            .message_id
            .map(|id| format!("#{id}"))
            .unwrap_or_default();
        println!(
            "{:>6} {:<8} {:<24} {:>10}  {}",
            target.thread_id,
            message,
            result.title(),
            result.date(),
            result.snippet(),
        );
    }
}
