use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "raidbell=info".into()),
        )
        .init();

    // load config: explicit RAIDBELL_CONFIG path > ~/.raidbell/raidbell.toml
    let config_path = std::env::var("RAIDBELL_CONFIG").ok();
    let config = raidbell_core::config::BotConfig::load(config_path.as_deref())?;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;
    raidbell_store::db::init_db(&db)?;
    drop(db);

    // separate connections: admin handlers write while the engine scans
    let admin_store = raidbell_store::EventStore::new(rusqlite::Connection::open(db_path)?)?;
    let engine_store = raidbell_store::EventStore::new(rusqlite::Connection::open(db_path)?)?;

    let clock = raidbell_core::Clock::from_offset_hours(config.scheduler.utc_offset_hours)?;
    info!(
        utc_offset_hours = config.scheduler.utc_offset_hours,
        group_chat_id = config.telegram.group_chat_id,
        "raidbell starting"
    );

    let bot = Bot::new(config.telegram.bot_token.clone());
    let notifier = raidbell_telegram::ChannelNotifier::new(
        bot.clone(),
        ChatId(config.telegram.group_chat_id),
    );

    let engine = raidbell_scheduler::ReminderEngine::new(
        engine_store,
        Arc::new(notifier),
        clock,
        Duration::from_secs(config.scheduler.tick_secs),
        Duration::from_secs(config.scheduler.retention_secs),
    );

    // engine loop in the background, admin dispatcher in the foreground
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move { engine.run(shutdown_rx).await });

    let adapter = raidbell_telegram::TelegramAdapter::new(bot, &config.telegram, admin_store);
    adapter.run().await;

    // dispatcher returned — stop the engine loop before exit
    let _ = shutdown_tx.send(true);
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
