//! Error types for journal access and homework reduction.

use thiserror::Error;

/// Errors returned by [`JournalApi`](crate::JournalApi) implementations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The journal answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status { status: u16, endpoint: String },

    /// The response body did not have the expected shape.
    #[error("malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },

    /// The journal kept reporting further pages past the page cap.
    #[error("{endpoint} still had pages after {pages} requests")]
    PaginationExhausted { endpoint: String, pages: u32 },
}

impl JournalError {
    /// Whether the journal refused the request itself (4xx), as opposed to
    /// being unreachable or failing internally.
    pub fn is_rejection(&self) -> bool {
        matches!(self, JournalError::Status { status, .. } if (400..500).contains(status))
    }
}

/// Errors raised while reducing lessons into homework.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HomeworkError {
    /// A lesson's `datetime_from` is not `DD.MM.YYYY ...`.
    #[error("invalid lesson date {value:?} for subject {subject}")]
    InvalidLessonDate { subject: String, value: String },
}
