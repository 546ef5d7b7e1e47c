//! Homework digest bot.
//!
//! The binary wires the pieces together: configuration from the
//! environment, the SQLite store, the journal client, the Telegram
//! listener and the delivery scheduler.

pub mod config;

pub use config::{Config, ConfigError};
