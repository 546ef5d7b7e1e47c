//! Database models.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Onboarding state of a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RecipientState {
    /// Waiting for a journal credential token.
    NeedToken,
    /// Reserved for choosing among several educations; nothing moves a
    /// recipient into this state.
    NeedEducation,
    /// Token accepted, educations linked, deliveries enabled.
    Complete,
}

impl RecipientState {
    /// Get the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedToken => "need_token",
            Self::NeedEducation => "need_education",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for RecipientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recipient, identified by their messaging id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Recipient {
    /// Messaging user id.
    pub id: i64,
    /// Onboarding state.
    pub state: RecipientState,
    /// Journal credential token, set once accepted.
    pub token: Option<String>,
    /// Chat the digests are delivered to.
    pub chat_id: i64,
}

impl Recipient {
    /// Whether the recipient finished onboarding.
    pub fn is_complete(&self) -> bool {
        self.state == RecipientState::Complete
    }
}

/// An education linked to a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Education {
    /// External education id in the journal.
    pub education_id: i64,
    /// Owning recipient.
    pub recipient_id: i64,
    #[sqlx(rename = "firstname")]
    pub first_name: String,
    #[sqlx(rename = "lastname")]
    pub last_name: String,
    /// Institution name.
    pub school: String,
    /// Class / group name.
    #[sqlx(rename = "class")]
    pub class_name: String,
}

/// An education to link when a credential is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEducation {
    pub education_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub school: String,
    pub class_name: String,
}

/// Delivery time of one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DeliverySlot {
    pub recipient_id: i64,
    /// Day of week, Monday = 0.
    pub weekday: i64,
    /// Zero-padded `HH:MM`.
    pub time: String,
}
