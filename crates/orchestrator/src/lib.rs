//! Command handling and scheduled delivery for the homework digest bot.
//!
//! This crate provides the [`Orchestrator`] type which coordinates the
//! recipient store, the school journal and the messaging transport.
//!
//! # Features
//!
//! - Parses recipient commands (`/start`, `/token`, `/time`, `/homework`, ...)
//! - Drives the onboarding state machine
//! - Builds and sends one homework digest per linked education
//! - Fires deliveries for due weekday/time slots, at most once per day
//!
//! # Architecture
//!
//! ```text
//!  Telegram update (from message-listener)      DeliveryScheduler tick
//!               ↓                                        ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ORCHESTRATOR (one gate)                     │
//! │                                                             │
//! │  commands ──► onboarding ──► database                       │
//! │                                                             │
//! │  delivery cycle, per education:                             │
//! │     lessons (today-31..today) + next school day timetable   │
//! │         ↓                                                   │
//! │     reduce ──► filter ──► render ──► send text + documents  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orchestrator::{DeliveryScheduler, InboundMessage, Orchestrator, RecordingSender};
//!
//! let orchestrator = Arc::new(Orchestrator::new(database, journal, RecordingSender::new()));
//!
//! // Inbound command
//! orchestrator.handle(&InboundMessage::direct(1001, "/start")).await?;
//!
//! // Scheduled deliveries
//! let scheduler = DeliveryScheduler::new(orchestrator.clone(), orchestrator::DEFAULT_TICK_INTERVAL);
//! tokio::spawn(async move { scheduler.run().await });
//! ```

mod commands;
mod delivery;
mod error;
pub mod messages;
mod notifier;
mod onboarding;
mod orchestrator;
mod scheduler;
mod sender;

// Public exports
pub use commands::{Command, InboundMessage, TIME_USAGE, TOKEN_USAGE};
pub use delivery::{
    deliver, DeliveryReport, DeliveryWindow, DEFAULT_LOOKAHEAD_DAYS, DEFAULT_LOOKBACK_DAYS,
};
pub use error::{OrchestratorError, Precondition, UpstreamError};
pub use messages::HELP_TEXT;
pub use notifier::{render_digest, send_digest};
pub use onboarding::SlotChange;
pub use orchestrator::Orchestrator;
pub use scheduler::{DeliveryLedger, DeliveryScheduler, TickReport, DEFAULT_TICK_INTERVAL};
pub use sender::{MessageSender, Outgoing, RecordingSender};
