//! Telegram message listener for the homework digest bot.
//!
//! This crate connects the Telegram transport to the orchestrator:
//!
//! - [`MessageListener`] checks the bot token and owns the Bot API client
//! - [`MessageProcessor`] long-polls updates and turns text messages into
//!   orchestrator commands
//! - [`TelegramSender`] sends replies, digests and documents back
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use message_listener::{MessageListener, MessageProcessor, ProcessorConfig, TelegramSender};
//! use orchestrator::Orchestrator;
//! use telegram_bot::BotConfig;
//!
//! let listener = MessageListener::connect(BotConfig::new("123456:ABC-DEF")).await?;
//! let sender = TelegramSender::new(listener.client().clone());
//! let orchestrator = Arc::new(Orchestrator::new(database, journal, sender));
//!
//! let processor = MessageProcessor::new(
//!     listener.client().clone(),
//!     orchestrator,
//!     ProcessorConfig::default(),
//! );
//! processor.run_with_shutdown(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

mod processor;
mod sender;

use telegram_bot::{BotConfig, TelegramClient, TelegramError};
use thiserror::Error;
use tracing::info;

pub use processor::{MessageProcessor, ProcessResult, ProcessorConfig, ProcessorError};
pub use sender::TelegramSender;

// Re-export the Telegram types users need
pub use telegram_bot::{Message, Update};

/// Errors that can occur during message listening.
#[derive(Debug, Error)]
pub enum Error {
    /// Telegram communication error.
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),
}

/// A connected Telegram bot.
#[derive(Clone)]
pub struct MessageListener {
    client: TelegramClient,
}

impl MessageListener {
    /// Connect to the Bot API and create a listener.
    ///
    /// Fails if the token is rejected.
    pub async fn connect(config: BotConfig) -> Result<Self, Error> {
        let client = TelegramClient::connect(config).await?;
        info!("MessageListener connected to Telegram");
        Ok(Self { client })
    }

    /// Get the underlying TelegramClient.
    pub fn client(&self) -> &TelegramClient {
        &self.client
    }
}
