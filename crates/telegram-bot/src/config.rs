//! Configuration types for telegram-bot.

use std::fmt;
use std::time::Duration;

/// Default Bot API server.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Configuration for talking to the Bot API.
#[derive(Clone)]
pub struct BotConfig {
    /// Bot token issued by BotFather.
    pub token: String,
    /// Base URL of the Bot API server (e.g., "https://api.telegram.org").
    pub api_url: String,
    /// Long polling timeout for `getUpdates`, in seconds.
    pub poll_timeout: u64,
    /// Timeout for every other request.
    pub request_timeout: Duration,
}

impl BotConfig {
    /// Create a new configuration with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout: 30,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Use a different Bot API server (local server, test double).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the long polling timeout in seconds.
    pub fn with_poll_timeout(mut self, seconds: u64) -> Self {
        self.poll_timeout = seconds;
        self
    }

    /// Get the URL of a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.trim_end_matches('/'),
            self.token,
            method
        )
    }

    /// Request timeout for `getUpdates`, long enough to outlive the poll.
    pub fn poll_request_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout) + self.request_timeout
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout", &self.poll_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
