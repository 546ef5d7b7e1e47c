//! The journal port.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::JournalError;
use crate::types::{ChildProfile, Lesson};

/// Access to the school journal.
///
/// Implemented over HTTP by `journal-client` and in memory by
/// `mock-journal`. This trait is object-safe.
#[async_trait]
pub trait JournalApi: Send + Sync {
    /// Fetch every lesson of an education between two dates (inclusive).
    async fn fetch_lessons(
        &self,
        education_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError>;

    /// Fetch the timetable of an education for one day.
    async fn fetch_schedule(
        &self,
        education_id: i64,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError>;

    /// Download an attachment by its uuid.
    async fn fetch_file(&self, uuid: &str) -> Result<Vec<u8>, JournalError>;

    /// List the children (and their educations) a credential token gives access to.
    ///
    /// A rejected token surfaces as a [`JournalError::Status`] with a 4xx status.
    async fn related_children(&self, token: &str) -> Result<Vec<ChildProfile>, JournalError>;

    /// Human-readable name of the implementation.
    fn name(&self) -> &str;
}
