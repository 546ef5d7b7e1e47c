//! Error types for orchestrator operations.

use std::fmt;

use database::{DatabaseError, ValidationError};
use homework_core::{HomeworkError, JournalError};
use thiserror::Error;

use crate::messages;

/// Errors that can occur while handling a command or a delivery.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// User input was rejected (bad token, weekday, time or syntax).
    /// The message is shown to the user as is.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The journal failed or returned data that could not be used.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// The recipient is not in a state that allows the operation.
    #[error("precondition failed: {0}")]
    Precondition(Precondition),

    /// Recipient store failure.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Failures of the journal or of the data it returned.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error(transparent)]
    Homework(#[from] HomeworkError),
}

/// State requirements a command can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No recipient row yet.
    NotInitialized,
    /// The recipient has not finished onboarding.
    SetupIncomplete,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::NotInitialized => f.write_str("recipient not initialized"),
            Precondition::SetupIncomplete => f.write_str("recipient setup incomplete"),
        }
    }
}

impl From<JournalError> for OrchestratorError {
    fn from(error: JournalError) -> Self {
        OrchestratorError::Upstream(UpstreamError::Journal(error))
    }
}

impl From<HomeworkError> for OrchestratorError {
    fn from(error: HomeworkError) -> Self {
        OrchestratorError::Upstream(UpstreamError::Homework(error))
    }
}

impl From<ValidationError> for OrchestratorError {
    fn from(error: ValidationError) -> Self {
        OrchestratorError::Validation(error.to_string())
    }
}

impl OrchestratorError {
    /// Text shown to the user when a command fails with this error.
    pub fn user_message(&self) -> String {
        match self {
            OrchestratorError::Validation(message) => message.clone(),
            OrchestratorError::Upstream(_) => messages::JOURNAL_UNAVAILABLE.to_string(),
            OrchestratorError::Precondition(Precondition::NotInitialized) => {
                messages::NOT_INITIALIZED.to_string()
            }
            OrchestratorError::Precondition(Precondition::SetupIncomplete) => {
                messages::SETUP_INCOMPLETE.to_string()
            }
            OrchestratorError::Database(_) | OrchestratorError::SendFailed(_) => {
                messages::GENERIC_FAILURE.to_string()
            }
        }
    }
}
