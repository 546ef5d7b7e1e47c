//! Long-polling stream of incoming updates.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::client::TelegramClient;
use crate::error::TelegramError;
use crate::types::Update;

/// Configuration for retrying failed polls.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Maximum number of consecutive failures (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Check if we should retry after the given number of failures.
    pub fn should_retry(&self, failures: u32) -> bool {
        self.max_retries.map_or(true, |max| failures < max)
    }
}

/// A stream of incoming updates.
///
/// Polling runs in a background task that stops when the stream is dropped
/// or the retry budget is spent. Poll errors are yielded to the consumer
/// before the next retry.
pub struct UpdateStream {
    rx: mpsc::Receiver<Result<Update, TelegramError>>,
    handle: JoinHandle<()>,
}

impl UpdateStream {
    fn spawn(client: TelegramClient, backoff: BackoffConfig) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(poll_loop(client, backoff, tx));
        Self { rx, handle }
    }
}

impl Drop for UpdateStream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl Stream for UpdateStream {
    type Item = Result<Update, TelegramError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

async fn poll_loop(
    client: TelegramClient,
    backoff: BackoffConfig,
    tx: mpsc::Sender<Result<Update, TelegramError>>,
) {
    info!("Telegram polling loop started");
    let mut offset: Option<i64> = None;
    let mut failures: u32 = 0;

    loop {
        match client.get_updates(offset).await {
            Ok(updates) => {
                failures = 0;
                for update in updates {
                    offset = Some(update.update_id + 1);
                    if tx.send(Ok(update)).await.is_err() {
                        info!("Telegram polling stopped (receiver dropped)");
                        return;
                    }
                }
            }
            Err(e) => {
                error!("Telegram polling error: {}", e);
                let unauthorized = e.is_unauthorized();
                if tx.send(Err(e)).await.is_err() {
                    return;
                }
                if unauthorized {
                    warn!("Bot token rejected, polling stopped");
                    return;
                }

                if !backoff.should_retry(failures) {
                    warn!("Giving up polling after {} failures", failures);
                    return;
                }
                let delay = backoff.delay_for_attempt(failures);
                failures += 1;
                debug!("Retrying getUpdates in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Start polling with the default backoff.
pub fn subscribe(client: &TelegramClient) -> UpdateStream {
    UpdateStream::spawn(client.clone(), BackoffConfig::default())
}

/// Start polling with custom backoff.
pub fn subscribe_with_backoff(client: &TelegramClient, backoff: BackoffConfig) -> UpdateStream {
    UpdateStream::spawn(client.clone(), backoff)
}
