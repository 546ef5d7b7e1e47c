//! Delayed journal implementation - wraps another journal with artificial delay.

use std::time::Duration;

use chrono::NaiveDate;
use homework_core::{async_trait, ChildProfile, JournalApi, JournalError, Lesson};
use tokio::time::sleep;

/// A journal that wraps another journal and delays every request.
///
/// Useful for testing that a slow upstream holds up work queued behind it.
pub struct DelayedJournal<J: JournalApi> {
    inner: J,
    delay: Duration,
}

impl<J: JournalApi> DelayedJournal<J> {
    /// Create a new DelayedJournal wrapping the given journal with the specified delay.
    pub fn new(inner: J, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a journal with a delay in milliseconds.
    pub fn with_millis(inner: J, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Get the wrapped journal.
    pub fn inner(&self) -> &J {
        &self.inner
    }
}

#[async_trait]
impl<J: JournalApi> JournalApi for DelayedJournal<J> {
    async fn fetch_lessons(
        &self,
        education_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError> {
        sleep(self.delay).await;
        self.inner
            .fetch_lessons(education_id, date_from, date_to, token)
            .await
    }

    async fn fetch_schedule(
        &self,
        education_id: i64,
        date: NaiveDate,
        token: &str,
    ) -> Result<Vec<Lesson>, JournalError> {
        sleep(self.delay).await;
        self.inner.fetch_schedule(education_id, date, token).await
    }

    async fn fetch_file(&self, uuid: &str) -> Result<Vec<u8>, JournalError> {
        sleep(self.delay).await;
        self.inner.fetch_file(uuid).await
    }

    async fn related_children(&self, token: &str) -> Result<Vec<ChildProfile>, JournalError> {
        sleep(self.delay).await;
        self.inner.related_children(token).await
    }

    fn name(&self) -> &str {
        "DelayedJournal"
    }
}
