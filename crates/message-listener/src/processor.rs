//! Message processor that connects the Telegram update stream to the orchestrator.

use std::sync::Arc;

use futures::StreamExt;
use homework_core::JournalApi;
use orchestrator::{InboundMessage, MessageSender, Orchestrator, OrchestratorError};
use telegram_bot::{TelegramClient, TelegramError, Update};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Configuration for the message processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Whether to process messages from group chats.
    pub process_groups: bool,

    /// Whether to ignore messages sent by other bots.
    pub ignore_bots: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            process_groups: true,
            ignore_bots: true,
        }
    }
}

impl ProcessorConfig {
    /// Only process private chats.
    pub fn private_only() -> Self {
        Self {
            process_groups: false,
            ..Default::default()
        }
    }
}

/// Errors that can occur during message processing.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Error from the Bot API.
    #[error("telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// Error from the orchestrator while handling a command.
    #[error("orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// The update stream ended unexpectedly.
    #[error("update stream ended")]
    StreamEnded,
}

/// Result of processing a single update.
#[derive(Debug)]
pub enum ProcessResult {
    /// The message was handed to the orchestrator.
    Handled {
        sender_id: i64,
        chat_id: i64,
        update_id: i64,
    },
    /// The update was skipped (no text, a bot, a filtered chat).
    Skipped { reason: String },
    /// Error occurred during processing.
    Error(ProcessorError),
}

/// Receives Telegram updates and runs them through the orchestrator.
pub struct MessageProcessor<S: MessageSender, J: JournalApi> {
    client: TelegramClient,
    orchestrator: Arc<Orchestrator<S, J>>,
    config: ProcessorConfig,
}

impl<S: MessageSender, J: JournalApi> MessageProcessor<S, J> {
    /// Create a new message processor.
    pub fn new(
        client: TelegramClient,
        orchestrator: Arc<Orchestrator<S, J>>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            client,
            orchestrator,
            config,
        }
    }

    /// Create a processor with default configuration.
    pub fn with_defaults(client: TelegramClient, orchestrator: Arc<Orchestrator<S, J>>) -> Self {
        Self::new(client, orchestrator, ProcessorConfig::default())
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator<S, J>> {
        &self.orchestrator
    }

    pub fn client(&self) -> &TelegramClient {
        &self.client
    }

    /// Turn an update into an inbound message, or say why it is skipped.
    fn to_inbound(&self, update: &Update) -> Result<InboundMessage, String> {
        let Some(message) = update.text_message() else {
            return Err("no text message".to_string());
        };

        if self.config.ignore_bots && message.from.as_ref().is_some_and(|u| u.is_bot) {
            return Err("message from a bot".to_string());
        }

        if !self.config.process_groups && message.chat.kind != "private" {
            return Err(format!("{} chat", message.chat.kind));
        }

        let text = message.text.clone().unwrap_or_default();
        Ok(InboundMessage::new(message.sender_id(), message.chat.id, text))
    }

    /// Process a single update.
    pub async fn process_update(&self, update: &Update) -> ProcessResult {
        let inbound = match self.to_inbound(update) {
            Ok(inbound) => inbound,
            Err(reason) => {
                debug!(update_id = update.update_id, reason = %reason, "Skipping update");
                return ProcessResult::Skipped { reason };
            }
        };

        info!(
            update_id = update.update_id,
            sender_id = inbound.sender_id,
            chat_id = inbound.chat_id,
            "Processing message"
        );

        match self.orchestrator.handle(&inbound).await {
            Ok(()) => ProcessResult::Handled {
                sender_id: inbound.sender_id,
                chat_id: inbound.chat_id,
                update_id: update.update_id,
            },
            Err(e) => {
                // The orchestrator already told the user; only the log remains.
                warn!(sender_id = inbound.sender_id, error = %e, "Command failed");
                ProcessResult::Error(ProcessorError::Orchestrator(e))
            }
        }
    }

    /// Run the processor until `shutdown` resolves.
    pub async fn run_with_shutdown<F>(&self, shutdown: F) -> Result<(), ProcessorError>
    where
        F: std::future::Future<Output = ()>,
    {
        info!("Starting message processor with shutdown signal");

        let mut stream = telegram_bot::subscribe(&self.client);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    return Ok(());
                }

                result = stream.next() => {
                    match result {
                        Some(Ok(update)) => {
                            self.process_update(&update).await;
                        }
                        Some(Err(e)) => {
                            error!("Update stream error: {}", e);
                        }
                        None => {
                            warn!("Update stream ended");
                            return Err(ProcessorError::StreamEnded);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::Database;
    use mock_journal::{child, StaticJournal};
    use orchestrator::{RecordingSender, HELP_TEXT};
    use std::time::Duration;
    use telegram_bot::BotConfig;

    type TestProcessor = MessageProcessor<RecordingSender, StaticJournal>;

    async fn processor_with(config: ProcessorConfig, bot: BotConfig) -> TestProcessor {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let journal = StaticJournal::new()
            .with_children("good", vec![child("Ivan", "Petrov", 11, "School 1", "3B")]);
        let orchestrator = Orchestrator::new(db, journal, RecordingSender::new());
        let client = TelegramClient::new(bot).unwrap();
        MessageProcessor::new(client, Arc::new(orchestrator), config)
    }

    async fn processor(config: ProcessorConfig) -> TestProcessor {
        processor_with(config, BotConfig::new("123:ABC")).await
    }

    fn update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    fn text_update(from: i64, chat: i64, kind: &str, text: &str) -> Update {
        update(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 10,
                "from": {"id": from, "is_bot": false, "first_name": "Anna"},
                "chat": {"id": chat, "type": kind},
                "date": 0,
                "text": text
            }
        }))
    }

    #[tokio::test]
    async fn test_text_message_is_handled() {
        let processor = processor(ProcessorConfig::default()).await;

        let result = processor
            .process_update(&text_update(7, 7, "private", "/help"))
            .await;

        assert!(matches!(
            result,
            ProcessResult::Handled { sender_id: 7, chat_id: 7, update_id: 1 }
        ));
        let sender = processor.orchestrator().sender();
        assert_eq!(sender.last_text(7).await.as_deref(), Some(HELP_TEXT));
    }

    #[tokio::test]
    async fn test_reply_goes_to_chat_not_sender() {
        let processor = processor(ProcessorConfig::default()).await;

        processor
            .process_update(&text_update(7, -100, "group", "/start"))
            .await;

        let sender = processor.orchestrator().sender();
        assert!(sender.texts(7).await.is_empty());
        assert_eq!(sender.texts(-100).await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_without_text_is_skipped() {
        let processor = processor(ProcessorConfig::default()).await;
        let photo = update(serde_json::json!({
            "update_id": 2,
            "message": {
                "message_id": 11,
                "from": {"id": 7, "is_bot": false, "first_name": "Anna"},
                "chat": {"id": 7, "type": "private"},
                "date": 0
            }
        }));
        let empty = update(serde_json::json!({"update_id": 3}));

        assert!(matches!(processor.process_update(&photo).await, ProcessResult::Skipped { .. }));
        assert!(matches!(processor.process_update(&empty).await, ProcessResult::Skipped { .. }));
        assert!(processor.orchestrator().sender().sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_bot_messages_are_skipped() {
        let processor = processor(ProcessorConfig::default()).await;
        let from_bot = update(serde_json::json!({
            "update_id": 4,
            "message": {
                "message_id": 12,
                "from": {"id": 99, "is_bot": true, "first_name": "OtherBot"},
                "chat": {"id": 99, "type": "private"},
                "date": 0,
                "text": "/help"
            }
        }));

        assert!(matches!(
            processor.process_update(&from_bot).await,
            ProcessResult::Skipped { .. }
        ));
    }

    #[tokio::test]
    async fn test_private_only_skips_groups() {
        let processor = processor(ProcessorConfig::private_only()).await;

        let result = processor
            .process_update(&text_update(7, -100, "supergroup", "/help"))
            .await;

        match result {
            ProcessResult::Skipped { reason } => assert_eq!(reason, "supergroup chat"),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_command_reports_error() {
        let processor = processor(ProcessorConfig::default()).await;

        let result = processor
            .process_update(&text_update(7, 7, "private", "/homework"))
            .await;

        assert!(matches!(
            result,
            ProcessResult::Error(ProcessorError::Orchestrator(_))
        ));
    }

    #[tokio::test]
    async fn test_group_chat_is_one_recipient() {
        let processor = processor(ProcessorConfig::default()).await;

        processor
            .process_update(&text_update(7, -100, "group", "/start"))
            .await;
        processor
            .process_update(&text_update(8, -100, "group", "/start"))
            .await;
        processor
            .process_update(&text_update(7, 7, "private", "/start"))
            .await;

        let pool = processor.orchestrator().database().pool();
        let recipients = database::recipient::list_recipients(pool).await.unwrap();
        let keys: Vec<_> = recipients.iter().map(|r| (r.id, r.chat_id)).collect();
        assert_eq!(keys, vec![(-100, -100), (7, 7)]);
    }

    #[tokio::test]
    async fn test_run_with_shutdown_handles_polled_updates() {
        let mut server = mockito::Server::new_async().await;
        let _updates = server
            .mock("GET", "/bot123:ABC/getUpdates")
            .match_query(mockito::Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "ok": true,
                    "result": [{
                        "update_id": 500,
                        "message": {
                            "message_id": 1,
                            "from": {"id": 7, "is_bot": false, "first_name": "Anna"},
                            "chat": {"id": 7, "type": "private"},
                            "date": 0,
                            "text": "/help"
                        }
                    }]
                })
                .to_string(),
            )
            .expect_at_least(1)
            .create_async()
            .await;
        let bot = BotConfig::new("123:ABC")
            .with_api_url(server.url())
            .with_poll_timeout(0);
        let processor = processor_with(ProcessorConfig::default(), bot).await;

        let orchestrator = processor.orchestrator().clone();
        let shutdown = async move {
            while orchestrator.sender().last_text(7).await.is_none() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };

        tokio::time::timeout(Duration::from_secs(5), processor.run_with_shutdown(shutdown))
            .await
            .expect("processor should stop on shutdown")
            .unwrap();

        let sender = processor.orchestrator().sender();
        assert_eq!(sender.last_text(7).await.as_deref(), Some(HELP_TEXT));
    }
}
