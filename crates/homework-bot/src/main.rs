//! Homework digest bot entry point.

use std::sync::Arc;

use database::Database;
use homework_bot::Config;
use journal_client::{JournalClient, JournalConfig};
use message_listener::{MessageListener, MessageProcessor, ProcessorConfig, TelegramSender};
use orchestrator::{DeliveryScheduler, Orchestrator};
use telegram_bot::BotConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!(?config, "Starting homework bot");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    let recipients = database::recipient::list_recipients(db.pool()).await?;
    let complete = recipients.iter().filter(|r| r.is_complete()).count();
    info!(recipients = recipients.len(), complete, "Database ready");

    // Journal client
    let mut journal_config = match &config.journal_api_url {
        Some(url) => JournalConfig::new(url.as_str()),
        None => JournalConfig::default(),
    };
    if let Some(max_pages) = config.journal_max_pages {
        journal_config = journal_config.with_max_pages(max_pages);
    }
    let journal = JournalClient::new(journal_config)?;

    // Telegram
    let mut bot_config = BotConfig::new(config.telegram_token.as_str());
    if let Some(url) = &config.telegram_api_url {
        bot_config = bot_config.with_api_url(url.as_str());
    }
    let listener = MessageListener::connect(bot_config).await?;
    let sender = TelegramSender::new(listener.client().clone());

    let orchestrator =
        Arc::new(Orchestrator::new(db.clone(), journal, sender).with_window(config.window));

    let scheduler = DeliveryScheduler::new(orchestrator.clone(), config.tick_interval);
    let scheduler_task = tokio::spawn(async move { scheduler.run().await });

    let processor = MessageProcessor::new(
        listener.client().clone(),
        orchestrator,
        ProcessorConfig::default(),
    );

    info!("Homework bot running, press Ctrl+C to stop");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    if let Err(e) = processor.run_with_shutdown(shutdown).await {
        error!("Message processor stopped: {}", e);
    }

    scheduler_task.abort();
    db.close().await;
    info!("Homework bot stopped");

    Ok(())
}
