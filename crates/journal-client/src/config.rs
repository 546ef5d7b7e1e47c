//! Configuration types for journal-client.

use std::time::Duration;

/// Default API root of the St. Petersburg school journal.
pub const DEFAULT_BASE_URL: &str = "https://dnevnik2.petersburgedu.ru/api";

/// Default cap on pages requested per listing.
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Configuration for connecting to the journal API.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// API root (e.g., "https://dnevnik2.petersburgedu.ru/api").
    pub base_url: String,
    /// Maximum number of pages fetched for one listing.
    pub max_pages: u32,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl JournalConfig {
    /// Create a new configuration with the given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the page cap. Values below one are raised to one.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Lesson listing endpoint.
    pub fn lessons_url(&self) -> String {
        format!("{}/journal/lesson/list-by-education", self.base_url)
    }

    /// Timetable listing endpoint.
    pub fn schedule_url(&self) -> String {
        format!("{}/journal/schedule/list-by-education", self.base_url)
    }

    /// Credential validation endpoint.
    pub fn related_children_url(&self) -> String {
        format!("{}/journal/person/related-child-list", self.base_url)
    }

    /// Attachment download endpoint.
    pub fn file_url(&self) -> String {
        format!("{}/filekit/file/download", self.base_url)
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
