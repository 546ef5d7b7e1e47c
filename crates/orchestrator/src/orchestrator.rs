//! Main orchestrator that coordinates commands and deliveries.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use database::{delivery_slot, recipient, Database, RecipientState, SlotSetting};
use homework_core::JournalApi;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::commands::{Command, InboundMessage};
use crate::delivery::{self, DeliveryReport, DeliveryWindow};
use crate::error::OrchestratorError;
use crate::messages;
use crate::onboarding;
use crate::scheduler::{DeliveryLedger, TickReport};
use crate::sender::MessageSender;

/// Main orchestrator that coordinates command handling and deliveries.
///
/// The orchestrator:
/// - Parses recipient commands and drives the onboarding state machine
/// - Runs the delivery cycle on request and for due slots
/// - Tells the recipient about every failed command
///
/// Every command and every scheduler tick runs while holding one gate, so
/// store access, journal calls and sends never interleave.
pub struct Orchestrator<S: MessageSender, J: JournalApi> {
    /// Recipient store.
    database: Database,
    /// School journal.
    journal: J,
    /// Message sender for Telegram or other transports.
    sender: S,
    /// Lesson and timetable date ranges.
    window: DeliveryWindow,
    gate: Mutex<()>,
}

impl<S: MessageSender, J: JournalApi> Orchestrator<S, J> {
    /// Create a new orchestrator with the given components.
    pub fn new(database: Database, journal: J, sender: S) -> Self {
        Self {
            database,
            journal,
            sender,
            window: DeliveryWindow::default(),
            gate: Mutex::new(()),
        }
    }

    /// Use different lesson and timetable date ranges.
    pub fn with_window(mut self, window: DeliveryWindow) -> Self {
        self.window = window;
        self
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn journal(&self) -> &J {
        &self.journal
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn window(&self) -> DeliveryWindow {
        self.window
    }

    /// Handle an incoming message end-to-end.
    ///
    /// On failure the recipient has already been told why; the error is
    /// returned for logging.
    pub async fn handle(&self, message: &InboundMessage) -> Result<(), OrchestratorError> {
        self.handle_on(message, Local::now().date_naive()).await
    }

    /// Handle an incoming message as if today were `today`.
    pub async fn handle_on(
        &self,
        message: &InboundMessage,
        today: NaiveDate,
    ) -> Result<(), OrchestratorError> {
        let _gate = self.gate.lock().await;

        let command = Command::parse(&message.text);
        info!(
            recipient_id = message.recipient_id(),
            sender_id = message.sender_id,
            command = command.name(),
            "Handling command"
        );

        let result = self.execute(message, command, today).await;
        if let Err(e) = &result {
            self.notify_failure(message.recipient_id(), message.chat_id, e).await;
        }
        result
    }

    async fn execute(
        &self,
        message: &InboundMessage,
        command: Command,
        today: NaiveDate,
    ) -> Result<(), OrchestratorError> {
        let recipient_id = message.recipient_id();
        let chat_id = message.chat_id;

        match command {
            Command::Reset => {
                onboarding::reset(&self.database, recipient_id, chat_id).await?;
                self.reply(chat_id, messages::WELCOME).await
            }

            Command::SetCredential(token) => self.link_credential(message, &token).await,

            Command::Text(text) => {
                let recipient = onboarding::require_recipient(&self.database, recipient_id).await?;
                if recipient.state == RecipientState::NeedToken && !text.is_empty() {
                    self.link_credential(message, &text).await
                } else {
                    self.reply(chat_id, messages::UNKNOWN_COMMAND).await
                }
            }

            Command::SetTime { weekday, time } => {
                let change =
                    onboarding::set_time(&self.database, recipient_id, &weekday, &time).await?;
                let reply = match change.setting {
                    SlotSetting::At(_) if change.weekday == 6 => messages::SETUP_FINISHED.to_string(),
                    SlotSetting::At(time) => messages::slot_updated(change.weekday, &time),
                    SlotSetting::Disabled => messages::slot_disabled(change.weekday),
                };
                self.reply(chat_id, &reply).await
            }

            Command::RequestHomework => {
                let report = self.deliver(recipient_id, today).await?;
                info!(
                    recipient_id,
                    delivered = report.delivered,
                    failed = report.failed,
                    "Requested homework sent"
                );
                Ok(())
            }

            Command::ListSchedule => {
                let slots = onboarding::schedule(&self.database, recipient_id).await?;
                self.reply(chat_id, &messages::schedule_listing(&slots)).await
            }

            Command::Help => self.reply(chat_id, messages::HELP_TEXT).await,

            Command::Malformed(usage) => Err(OrchestratorError::Validation(usage.to_string())),

            Command::Unknown(_) => self.reply(chat_id, messages::UNKNOWN_COMMAND).await,
        }
    }

    async fn link_credential(
        &self,
        message: &InboundMessage,
        token: &str,
    ) -> Result<(), OrchestratorError> {
        let educations =
            onboarding::set_credential(&self.database, &self.journal, message.recipient_id(), token)
                .await?;
        self.reply(message.chat_id, &messages::credential_accepted(&educations))
            .await
    }

    /// Run the delivery cycle for one recipient.
    async fn deliver(
        &self,
        recipient_id: i64,
        today: NaiveDate,
    ) -> Result<DeliveryReport, OrchestratorError> {
        delivery::deliver(
            &self.database,
            &self.journal,
            &self.sender,
            self.window,
            recipient_id,
            today,
        )
        .await
    }

    /// Deliver to every recipient whose slot matches `now`'s weekday and
    /// minute exactly, in recipient id order.
    ///
    /// Slots already claimed in `ledger` are skipped. A failing recipient
    /// is told about it and does not stop the others; only a failure to
    /// read the due slots fails the tick.
    pub async fn deliver_due(
        &self,
        now: NaiveDateTime,
        ledger: &mut DeliveryLedger,
    ) -> Result<TickReport, OrchestratorError> {
        let _gate = self.gate.lock().await;

        let weekday = now.weekday().num_days_from_monday() as u8;
        let time = now.format("%H:%M").to_string();
        let today = now.date();

        let slots = delivery_slot::due_slots(self.database.pool(), weekday, &time).await?;
        let mut report = TickReport {
            due: slots.len(),
            ..Default::default()
        };

        for slot in slots {
            if !ledger.claim(today, slot.recipient_id, &slot.time) {
                report.skipped += 1;
                continue;
            }
            report.fired += 1;
            info!(recipient_id = slot.recipient_id, time = %slot.time, "Slot due");

            match self.deliver(slot.recipient_id, today).await {
                Ok(delivered) => {
                    report.delivered += delivered.delivered;
                    report.failed += delivered.failed;
                }
                Err(e) => {
                    report.rejected += 1;
                    let chat_id = self.chat_id_of(slot.recipient_id).await;
                    self.notify_failure(slot.recipient_id, chat_id, &e).await;
                }
            }
        }

        Ok(report)
    }

    async fn chat_id_of(&self, recipient_id: i64) -> i64 {
        match recipient::find_recipient(self.database.pool(), recipient_id).await {
            Ok(Some(recipient)) => recipient.chat_id,
            Ok(None) => recipient_id,
            Err(e) => {
                warn!(recipient_id, "Failed to look up chat, using recipient id: {}", e);
                recipient_id
            }
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError> {
        self.sender.send_message(chat_id, text).await
    }

    /// Log a failed command or delivery and tell the recipient.
    async fn notify_failure(&self, recipient_id: i64, chat_id: i64, error: &OrchestratorError) {
        match error {
            OrchestratorError::Validation(_) | OrchestratorError::Precondition(_) => {
                info!(recipient_id, "Command refused: {}", error);
            }
            OrchestratorError::Upstream(_) => {
                warn!(recipient_id, "Journal failure: {}", error);
            }
            OrchestratorError::Database(_) | OrchestratorError::SendFailed(_) => {
                error!(recipient_id, "Command failed: {}", error);
            }
        }

        if matches!(error, OrchestratorError::SendFailed(_)) {
            return;
        }
        if let Err(e) = self.sender.send_message(chat_id, &error.user_message()).await {
            warn!(recipient_id, "Failed to send error notice: {}", e);
        }
    }
}
