//! School journal HTTP client.
//!
//! This crate implements [`homework_core::JournalApi`] against the journal's
//! REST API. It supports:
//!
//! - Paginated lesson and timetable listing (bounded page count)
//! - Attachment download
//! - Credential validation through the related-children listing
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use homework_core::JournalApi;
//! use journal_client::{JournalClient, JournalConfig};
//!
//! # async fn example() -> Result<(), homework_core::JournalError> {
//! let client = JournalClient::new(JournalConfig::default())?;
//! let children = client.related_children("jwt-token").await?;
//!
//! for child in &children {
//!     for education in &child.educations {
//!         let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
//!         let schedule = client
//!             .fetch_schedule(education.education_id, day, "jwt-token")
//!             .await?;
//!         println!("{} lessons on {}", schedule.len(), day);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod types;

pub use client::JournalClient;
pub use config::JournalConfig;
pub use types::{ListPage, RelatedChild, RelatedEducation, ResponseEnvelope};
