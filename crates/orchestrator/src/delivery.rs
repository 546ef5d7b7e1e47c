//! The per-recipient delivery cycle.

use chrono::{Duration, NaiveDate};
use database::{education, Database, Education};
use homework_core::{filter, reduce, JournalApi, Lesson};
use tracing::{debug, info, warn};

use crate::error::{OrchestratorError, Precondition};
use crate::messages;
use crate::notifier::{render_digest, send_digest};
use crate::onboarding::require_recipient;
use crate::sender::MessageSender;

/// Default number of past days searched for homework.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 31;

/// Default number of days probed for the next school day.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 14;

/// Date ranges used by a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryWindow {
    /// Lessons are fetched from `today - lookback_days` through today.
    pub lookback_days: u32,
    /// Timetables are probed from tomorrow through `today + lookahead_days`.
    pub lookahead_days: u32,
}

impl Default for DeliveryWindow {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

/// Outcome of one recipient's delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Educations linked to the recipient.
    pub educations: usize,
    /// Educations whose digest was sent.
    pub delivered: usize,
    /// Educations that failed; the recipient was told about each one.
    pub failed: usize,
}

/// Deliver homework to one recipient, one digest per linked education.
///
/// Fails only on preconditions and store errors. A failing education is
/// logged, reported to the recipient and counted; the others still run.
pub async fn deliver<S, J>(
    database: &Database,
    journal: &J,
    sender: &S,
    window: DeliveryWindow,
    recipient_id: i64,
    today: NaiveDate,
) -> Result<DeliveryReport, OrchestratorError>
where
    S: MessageSender + ?Sized,
    J: JournalApi + ?Sized,
{
    let recipient = require_recipient(database, recipient_id).await?;
    let token = match (&recipient.token, recipient.is_complete()) {
        (Some(token), true) => token.clone(),
        _ => return Err(OrchestratorError::Precondition(Precondition::SetupIncomplete)),
    };

    let educations = education::list_educations(database.pool(), recipient_id).await?;
    let mut report = DeliveryReport {
        educations: educations.len(),
        ..Default::default()
    };

    if educations.is_empty() {
        sender
            .send_message(recipient.chat_id, messages::NO_EDUCATIONS)
            .await?;
        return Ok(report);
    }

    for education in &educations {
        match deliver_education(journal, sender, window, education, recipient.chat_id, &token, today).await {
            Ok(documents) => {
                report.delivered += 1;
                info!(
                    recipient_id,
                    education_id = education.education_id,
                    documents,
                    "Homework delivered"
                );
            }
            Err(e) => {
                report.failed += 1;
                warn!(
                    recipient_id,
                    education_id = education.education_id,
                    "Homework delivery failed: {}",
                    e
                );
                let notice = messages::education_failed(&education.first_name, &education.last_name);
                if let Err(e) = sender.send_message(recipient.chat_id, &notice).await {
                    warn!(recipient_id, "Failed to send failure notice: {}", e);
                }
            }
        }
    }

    Ok(report)
}

/// Fetch, reduce, filter, render and send the digest of one education.
async fn deliver_education<S, J>(
    journal: &J,
    sender: &S,
    window: DeliveryWindow,
    education: &Education,
    chat_id: i64,
    token: &str,
    today: NaiveDate,
) -> Result<usize, OrchestratorError>
where
    S: MessageSender + ?Sized,
    J: JournalApi + ?Sized,
{
    let date_from = today - Duration::days(i64::from(window.lookback_days));
    let lessons = journal
        .fetch_lessons(education.education_id, date_from, today, token)
        .await?;
    let schedule = next_school_day(journal, education.education_id, today, window, token).await?;

    let homework = reduce(&lessons)?;
    let digest = filter(&schedule, &homework, journal).await?;
    debug!(
        education_id = education.education_id,
        lessons = lessons.len(),
        timetable = schedule.len(),
        subjects = digest.len(),
        "Digest built"
    );

    let text = render_digest(&education.first_name, &education.last_name, &digest);
    send_digest(sender, chat_id, &text, &digest).await
}

/// The first non-empty timetable after today, or an empty one if every
/// probed day is empty.
async fn next_school_day<J: JournalApi + ?Sized>(
    journal: &J,
    education_id: i64,
    today: NaiveDate,
    window: DeliveryWindow,
    token: &str,
) -> Result<Vec<Lesson>, OrchestratorError> {
    for offset in 1..=i64::from(window.lookahead_days) {
        let date = today + Duration::days(offset);
        let schedule = journal.fetch_schedule(education_id, date, token).await?;
        if !schedule.is_empty() {
            return Ok(schedule);
        }
    }
    Ok(Vec::new())
}
