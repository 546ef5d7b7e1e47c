//! Core types and algorithms for the homework digest bot.
//!
//! This crate holds everything that does not talk to the network or the
//! database directly:
//!
//! - [`Lesson`] / [`Task`] / [`FileRef`] - Records returned by the school journal
//! - [`JournalApi`] - The port every journal implementation must provide
//! - [`reduce`] - Collapses lessons into the latest homework per subject
//! - [`filter`] - Selects the homework due for the next school day and
//!   downloads its attachments
//!
//! # Example
//!
//! ```rust
//! use homework_core::{reduce, due_subjects, Lesson, Task};
//!
//! let lessons = vec![
//!     Lesson::new("Math", "01.03.2025 10:00:00", vec![Task::named("p.1-3")]),
//!     Lesson::new("Math", "03.03.2025 10:00:00", vec![Task::named("p.4")]),
//! ];
//! let homework = reduce(&lessons).unwrap();
//!
//! let schedule = vec![Lesson::new("Math", "04.03.2025 09:00:00", vec![])];
//! let due = due_subjects(&schedule, &homework);
//! assert_eq!(due[0].1[0].task_name.as_deref(), Some("p.4"));
//! ```

mod error;
mod filter;
mod journal;
mod reducer;
mod types;

pub use error::{HomeworkError, JournalError};
pub use filter::{due_subjects, filter};
pub use journal::JournalApi;
pub use reducer::{parse_lesson_date, reduce, Homework, SubjectHomework};
pub use types::{
    Attachment, ChildProfile, Digest, DigestEntry, DueTask, EducationRef, FileRef, Lesson, Task,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
