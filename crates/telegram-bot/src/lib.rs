//! Telegram Bot API client library.
//!
//! This crate provides a small Rust client for the Telegram Bot API over
//! HTTP. It supports:
//!
//! - Sending text messages (split at Telegram's length limit)
//! - Sending documents as multipart uploads
//! - Receiving messages via long polling (`getUpdates`)
//!
//! # Example
//!
//! ```no_run
//! use telegram_bot::{BotConfig, TelegramClient};
//!
//! # async fn example() -> Result<(), telegram_bot::TelegramError> {
//! // Connect and verify the token
//! let config = BotConfig::new("123456:ABC-DEF");
//! let client = TelegramClient::connect(config).await?;
//!
//! // Send a message
//! client.send_text(42, "Hello!").await?;
//!
//! // Receive incoming messages
//! use futures::StreamExt;
//! let mut updates = telegram_bot::subscribe(&client);
//! while let Some(result) = updates.next().await {
//!     match result {
//!         Ok(update) => {
//!             if let Some(message) = update.message {
//!                 println!("From {}: {:?}", message.chat.id, message.text);
//!             }
//!         }
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod polling;
pub mod types;

pub use client::{split_message, TelegramClient, MAX_MESSAGE_LENGTH};
pub use config::BotConfig;
pub use error::TelegramError;
pub use polling::{subscribe, subscribe_with_backoff, BackoffConfig, UpdateStream};
pub use types::*;
