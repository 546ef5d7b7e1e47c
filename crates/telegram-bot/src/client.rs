//! Telegram Bot API HTTP client.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::error::TelegramError;
use crate::types::{ApiResponse, Message, SendMessageParams, Update, User};

/// Longest text `sendMessage` accepts, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: BotConfig,
}

impl TelegramClient {
    /// Build a client without contacting the API.
    pub fn new(config: BotConfig) -> Result<Self, TelegramError> {
        if config.token.trim().is_empty() {
            return Err(TelegramError::Config("bot token is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(TelegramError::Http)?;

        Ok(Self { http, config })
    }

    /// Build a client and verify the token with `getMe`.
    pub async fn connect(config: BotConfig) -> Result<Self, TelegramError> {
        let client = Self::new(config)?;
        let me = client.get_me().await?;
        info!(
            "Connected to Telegram as @{} ({})",
            me.username.as_deref().unwrap_or("unknown"),
            me.first_name
        );
        Ok(client)
    }

    /// Get the configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Get the bot's own user.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        let request = self.http.get(self.config.method_url("getMe"));
        self.call(request, "getMe").await
    }

    /// Long-poll for updates with `update_id >= offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let mut query = vec![
            ("timeout", self.config.poll_timeout.to_string()),
            ("allowed_updates", r#"["message"]"#.to_string()),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let request = self
            .http
            .get(self.config.method_url("getUpdates"))
            .query(&query)
            .timeout(self.config.poll_request_timeout());
        let updates: Vec<Update> = self.call(request, "getUpdates").await?;

        if !updates.is_empty() {
            debug!("Received {} updates", updates.len());
        }
        Ok(updates)
    }

    /// Send a text message, split into several when it exceeds the limit.
    ///
    /// Returns the sent messages in order.
    pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<Vec<Message>, TelegramError> {
        let mut sent = Vec::new();
        for chunk in split_message(text, MAX_MESSAGE_LENGTH) {
            let params = SendMessageParams {
                chat_id,
                text: &chunk,
            };
            let request = self
                .http
                .post(self.config.method_url("sendMessage"))
                .json(&params);
            sent.push(self.call(request, "sendMessage").await?);
        }
        debug!(chat_id, parts = sent.len(), "Sent text message");
        Ok(sent)
    }

    /// Upload a document.
    pub async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        mime_type: Option<&str>,
    ) -> Result<Message, TelegramError> {
        let size = bytes.len();
        let mut part = Part::bytes(bytes).file_name(file_name.to_string());
        match mime_type.map(|value| value.parse::<mime::Mime>()) {
            Some(Ok(mime)) => {
                part = part.mime_str(mime.as_ref()).map_err(TelegramError::Http)?;
            }
            Some(Err(_)) => {
                // Telegram guesses the type from the file name instead.
                warn!(chat_id, file_name, mime_type, "Ignoring invalid MIME type");
            }
            None => {}
        }

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);

        let request = self
            .http
            .post(self.config.method_url("sendDocument"))
            .multipart(form);
        let message = self.call(request, "sendDocument").await?;

        debug!(chat_id, file_name, size, "Sent document");
        Ok(message)
    }

    /// Send a request and unwrap the Bot API envelope.
    ///
    /// The body is parsed whatever the HTTP status, since errors carry
    /// `error_code` and `description` too.
    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
    ) -> Result<T, TelegramError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            debug!("Unparseable {} response ({}): {}", method, status, body);
            TelegramError::Json(e)
        })?;

        match parsed {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(TelegramError::Api {
                code: error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: description.unwrap_or_else(|| format!("{} failed", method)),
            }),
        }
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Split text into chunks of at most `limit` characters.
///
/// Breaks at line ends where possible; a single line longer than the limit
/// is cut mid-line. Chunks never end with a newline and are never empty.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();

        if current_len + line_len > limit && current_len > 0 {
            push_chunk(&mut chunks, std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            for ch in line.chars() {
                if current_len == limit {
                    push_chunk(&mut chunks, std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(ch);
                current_len += 1;
            }
        } else {
            current.push_str(line);
            current_len += line_len;
        }
    }
    push_chunk(&mut chunks, current);

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    let trimmed = chunk.trim_end_matches('\n');
    if !trimmed.trim().is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_short_message() {
        assert_eq!(split_message("hello", 10), vec!["hello"]);
        assert!(split_message("", 10).is_empty());
        assert!(split_message("\n\n", 10).is_empty());
    }

    #[test]
    fn test_split_at_line_breaks() {
        let text = "Math:\np.4\n\nArt:\ndraw";
        let chunks = split_message(text, 12);
        assert_eq!(chunks, vec!["Math:\np.4", "Art:\ndraw"]);
    }

    #[test]
    fn test_split_long_line() {
        let text = "a".repeat(25);
        let chunks = split_message(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[2].len(), 5);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_counts_characters() {
        let text = "ДЗ".repeat(5);
        let chunks = split_message(&text, 4);
        assert_eq!(chunks, vec!["ДЗДЗ", "ДЗДЗ", "ДЗ"]);
    }

    #[test]
    fn test_new_rejects_empty_token() {
        let result = TelegramClient::new(BotConfig::new("  "));
        assert!(matches!(result, Err(TelegramError::Config(_))));
    }
}
