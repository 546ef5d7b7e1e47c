//! Message sender trait and implementations.

use async_trait::async_trait;
use homework_core::Attachment;
use tokio::sync::Mutex;

use crate::error::OrchestratorError;

/// Trait for sending texts and documents to a chat.
///
/// Abstracted to support different transports (Telegram, tests, etc.)
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError>;

    /// Send an attachment as a document.
    async fn send_document(
        &self,
        chat_id: i64,
        attachment: &Attachment,
    ) -> Result<(), OrchestratorError>;
}

/// Something a [`RecordingSender`] was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Text { chat_id: i64, text: String },
    Document { chat_id: i64, attachment: Attachment },
}

impl Outgoing {
    pub fn chat_id(&self) -> i64 {
        match self {
            Outgoing::Text { chat_id, .. } | Outgoing::Document { chat_id, .. } => *chat_id,
        }
    }
}

/// A sender that keeps everything it is asked to send, in order.
///
/// Sends to chats marked with [`RecordingSender::failing_for`] fail with
/// `SendFailed` and are not recorded.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Outgoing>>,
    failing_chats: Vec<i64>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send to this chat.
    pub fn failing_for(mut self, chat_id: i64) -> Self {
        self.failing_chats.push(chat_id);
        self
    }

    /// Everything sent so far.
    pub async fn sent(&self) -> Vec<Outgoing> {
        self.sent.lock().await.clone()
    }

    /// Texts sent to a chat.
    pub async fn texts(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|item| match item {
                Outgoing::Text { chat_id: id, text } if *id == chat_id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The last text sent to a chat.
    pub async fn last_text(&self, chat_id: i64) -> Option<String> {
        self.texts(chat_id).await.pop()
    }

    /// Names of documents sent to a chat.
    pub async fn documents(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|item| match item {
                Outgoing::Document {
                    chat_id: id,
                    attachment,
                } if *id == chat_id => Some(attachment.file_name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }

    fn check(&self, chat_id: i64) -> Result<(), OrchestratorError> {
        if self.failing_chats.contains(&chat_id) {
            Err(OrchestratorError::SendFailed(format!("chat {} unreachable", chat_id)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), OrchestratorError> {
        self.check(chat_id)?;
        self.sent.lock().await.push(Outgoing::Text {
            chat_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        attachment: &Attachment,
    ) -> Result<(), OrchestratorError> {
        self.check(chat_id)?;
        self.sent.lock().await.push(Outgoing::Document {
            chat_id,
            attachment: attachment.clone(),
        });
        Ok(())
    }
}
