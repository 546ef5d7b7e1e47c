//! Recipient onboarding state machine.
//!
//! ```text
//!   (first contact) ──/start──► NEED_TOKEN ──token accepted──► COMPLETE
//!                                  ▲   │                         │  │
//!                                  │   └──token rejected─────────┘  │ /time, /token
//!                                  └──────────/start────────────────┘
//! ```
//!
//! `NEED_EDUCATION` exists in the store but nothing moves a recipient into it.

use database::validation::{parse_slot_setting, parse_weekday};
use database::{delivery_slot, recipient, Database, DeliverySlot, NewEducation, Recipient, SlotSetting};
use homework_core::{ChildProfile, JournalApi};
use tracing::{info, warn};

use crate::commands::TOKEN_USAGE;
use crate::error::{OrchestratorError, Precondition};
use crate::messages::TOKEN_REJECTED;

/// A delivery time change that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChange {
    /// Day of week, Monday = 0.
    pub weekday: u8,
    pub setting: SlotSetting,
}

/// Create or reset a recipient: `NeedToken`, no token, no educations and
/// the seven default slots.
pub async fn reset(
    database: &Database,
    recipient_id: i64,
    chat_id: i64,
) -> Result<Recipient, OrchestratorError> {
    let recipient = recipient::initialize_recipient(database.pool(), recipient_id, chat_id).await?;
    info!(recipient_id, "Recipient reset");
    Ok(recipient)
}

/// Fetch a recipient, failing when there was never a first contact.
pub async fn require_recipient(
    database: &Database,
    recipient_id: i64,
) -> Result<Recipient, OrchestratorError> {
    recipient::find_recipient(database.pool(), recipient_id)
        .await?
        .ok_or(OrchestratorError::Precondition(Precondition::NotInitialized))
}

/// Validate a credential token with the journal and, if accepted, link the
/// educations it gives access to.
///
/// Accepted from any state, so a complete recipient can re-link. A rejected
/// or unverifiable token changes nothing.
pub async fn set_credential<J: JournalApi + ?Sized>(
    database: &Database,
    journal: &J,
    recipient_id: i64,
    token: &str,
) -> Result<Vec<NewEducation>, OrchestratorError> {
    require_recipient(database, recipient_id).await?;

    let token = token.trim();
    if token.is_empty() {
        return Err(OrchestratorError::Validation(TOKEN_USAGE.to_string()));
    }

    let children = match journal.related_children(token).await {
        Ok(children) => children,
        Err(e) if e.is_rejection() => {
            info!(recipient_id, "Credential rejected by journal: {}", e);
            return Err(OrchestratorError::Validation(TOKEN_REJECTED.to_string()));
        }
        Err(e) => {
            warn!(recipient_id, "Could not validate credential: {}", e);
            return Err(e.into());
        }
    };

    let educations = educations_of(&children);
    recipient::complete_onboarding(database.pool(), recipient_id, token, &educations).await?;
    Ok(educations)
}

/// Set or disable the delivery time of one weekday.
pub async fn set_time(
    database: &Database,
    recipient_id: i64,
    weekday: &str,
    time: &str,
) -> Result<SlotChange, OrchestratorError> {
    let recipient = require_recipient(database, recipient_id).await?;
    if !recipient.is_complete() {
        return Err(OrchestratorError::Precondition(Precondition::SetupIncomplete));
    }

    let weekday = parse_weekday(weekday)?;
    let setting = parse_slot_setting(time)?;

    match &setting {
        SlotSetting::At(time) => {
            delivery_slot::set_slot_time(database.pool(), recipient_id, weekday, time).await?;
        }
        SlotSetting::Disabled => {
            delivery_slot::delete_slot(database.pool(), recipient_id, weekday).await?;
        }
    }

    info!(recipient_id, weekday, ?setting, "Delivery slot updated");
    Ok(SlotChange { weekday, setting })
}

/// A recipient's delivery slots, Monday first.
pub async fn schedule(
    database: &Database,
    recipient_id: i64,
) -> Result<Vec<DeliverySlot>, OrchestratorError> {
    require_recipient(database, recipient_id).await?;
    Ok(delivery_slot::list_slots(database.pool(), recipient_id).await?)
}

/// One education row per (child, education) pair.
fn educations_of(children: &[ChildProfile]) -> Vec<NewEducation> {
    children
        .iter()
        .flat_map(|child| {
            child.educations.iter().map(move |education| NewEducation {
                education_id: education.education_id,
                first_name: child.first_name.clone(),
                last_name: child.last_name.clone(),
                school: education.institution.clone(),
                class_name: education.group.clone(),
            })
        })
        .collect()
}
