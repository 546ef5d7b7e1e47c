//! Mock school journal for testing.
//!
//! This crate provides in-memory implementations of the `JournalApi` trait:
//! - `StaticJournal` - Serves fixed lessons, timetables, files and children
//! - `DelayedJournal` - Wraps another journal with artificial delay
//!
//! For the real journal, use the `journal-client` crate instead.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mock_journal::{JournalApi, Lesson, StaticJournal, Task};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_journal::JournalError> {
//!     let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
//!     let journal = StaticJournal::new()
//!         .with_schedule(7, day, vec![Lesson::new("Math", "04.03.2025 09:00:00", vec![])]);
//!
//!     let schedule = journal.fetch_schedule(7, day, "token").await?;
//!     assert_eq!(schedule[0].subject_name, "Math");
//!     Ok(())
//! }
//! ```

mod delayed;
mod fixture;

// Re-export homework-core types for convenience
pub use homework_core::{
    async_trait, ChildProfile, EducationRef, FileRef, JournalApi, JournalError, Lesson, Task,
};

pub use delayed::DelayedJournal;
pub use fixture::{child, JournalCall, StaticJournal};
