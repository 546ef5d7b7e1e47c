//! Telegram implementation of the orchestrator's sender port.

use async_trait::async_trait;
use homework_core::Attachment;
use orchestrator::{MessageSender, OrchestratorError};
use telegram_bot::TelegramClient;
use tracing::debug;

/// Sends orchestrator output through the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    client: TelegramClient,
}

impl TelegramSender {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &TelegramClient {
        &self.client
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError> {
        let sent = self
            .client
            .send_text(chat_id, text)
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        debug!(chat_id, parts = sent.len(), "Message sent");
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        attachment: &Attachment,
    ) -> Result<(), OrchestratorError> {
        self.client
            .send_document(
                chat_id,
                &attachment.file_name,
                attachment.bytes.clone(),
                attachment.mime_type.as_deref(),
            )
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        Ok(())
    }
}
