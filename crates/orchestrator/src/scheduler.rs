//! Periodic delivery scheduler.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use homework_core::JournalApi;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::error::OrchestratorError;
use crate::orchestrator::Orchestrator;
use crate::sender::MessageSender;

/// Default time between two ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(20);

/// Slots already fired today, keyed by (date, recipient, slot time).
///
/// Lets the ticker run several times per minute while each slot fires at
/// most once per day. Entries of earlier days are dropped when the date
/// changes. Kept in memory only.
#[derive(Debug, Default)]
pub struct DeliveryLedger {
    date: Option<NaiveDate>,
    fired: HashSet<(i64, String)>,
}

impl DeliveryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a slot as fired. Returns false if it already fired that day.
    pub fn claim(&mut self, date: NaiveDate, recipient_id: i64, time: &str) -> bool {
        if self.date != Some(date) {
            self.fired.clear();
            self.date = Some(date);
        }
        self.fired.insert((recipient_id, time.to_string()))
    }

    /// Number of slots fired on the current date.
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Slots matching the tick's weekday and minute.
    pub due: usize,
    /// Slots delivered on this tick.
    pub fired: usize,
    /// Slots skipped because they already fired today.
    pub skipped: usize,
    /// Educations delivered across all fired slots.
    pub delivered: usize,
    /// Educations that failed across all fired slots.
    pub failed: usize,
    /// Recipients whose delivery could not start (setup incomplete, store error).
    pub rejected: usize,
}

/// Runs deliveries for due slots on a fixed interval.
pub struct DeliveryScheduler<S: MessageSender, J: JournalApi> {
    orchestrator: Arc<Orchestrator<S, J>>,
    ledger: Mutex<DeliveryLedger>,
    interval: Duration,
}

impl<S: MessageSender, J: JournalApi> DeliveryScheduler<S, J> {
    /// Create a scheduler ticking every `interval`.
    pub fn new(orchestrator: Arc<Orchestrator<S, J>>, interval: Duration) -> Self {
        Self {
            orchestrator,
            ledger: Mutex::new(DeliveryLedger::new()),
            interval,
        }
    }

    /// Evaluate the slots due at `now` (local wall-clock time).
    pub async fn tick_at(&self, now: NaiveDateTime) -> Result<TickReport, OrchestratorError> {
        let mut ledger = self.ledger.lock().await;
        self.orchestrator.deliver_due(now, &mut ledger).await
    }

    /// Tick forever. Failed ticks are logged and never stop the loop.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Delivery scheduler started (tick every {:?})", self.interval);

        loop {
            ticker.tick().await;
            let now = Local::now().naive_local();

            match self.tick_at(now).await {
                Ok(report) if report.fired > 0 => {
                    info!(
                        fired = report.fired,
                        delivered = report.delivered,
                        failed = report.failed,
                        rejected = report.rejected,
                        "Scheduled deliveries done"
                    );
                }
                Ok(report) => {
                    debug!(due = report.due, skipped = report.skipped, "Tick");
                }
                Err(e) => {
                    error!("Scheduler tick failed: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_ledger_claims_once_per_day() {
        let mut ledger = DeliveryLedger::new();

        assert!(ledger.claim(day(7), 1, "09:00"));
        assert!(!ledger.claim(day(7), 1, "09:00"));
        assert!(ledger.claim(day(7), 2, "09:00"));
        assert!(ledger.claim(day(7), 1, "09:30"));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_ledger_resets_on_new_day() {
        let mut ledger = DeliveryLedger::new();

        assert!(ledger.claim(day(7), 1, "09:00"));
        assert!(ledger.claim(day(14), 1, "09:00"));
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.is_empty());
    }
}
