//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use orchestrator::{DeliveryWindow, DEFAULT_LOOKAHEAD_DAYS, DEFAULT_LOOKBACK_DAYS};

const DEFAULT_DATABASE_URL: &str = "sqlite:homework.db?mode=rwc";
const DEFAULT_TICK_SECS: u64 = 20;

/// Bot configuration.
#[derive(Clone)]
pub struct Config {
    /// Telegram bot token.
    pub telegram_token: String,
    /// Bot API base URL override.
    pub telegram_api_url: Option<String>,
    /// SQLite database URL.
    pub database_url: String,
    /// Journal API base URL override.
    pub journal_api_url: Option<String>,
    /// Page cap for paginated journal queries.
    pub journal_max_pages: Option<u32>,
    /// Delivery scheduler tick.
    pub tick_interval: Duration,
    /// Lesson and timetable search window.
    pub window: DeliveryWindow,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("telegram_api_url", &self.telegram_api_url)
            .field("database_url", &self.database_url)
            .field("journal_api_url", &self.journal_api_url)
            .field("journal_max_pages", &self.journal_max_pages)
            .field("tick_interval", &self.tick_interval)
            .field("window", &self.window)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `TELEGRAM_BOT_TOKEN` | Bot API token | (required) |
    /// | `TELEGRAM_API_URL` | Bot API base URL | `https://api.telegram.org` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:homework.db?mode=rwc` |
    /// | `JOURNAL_API_URL` | Journal API base URL | client default |
    /// | `JOURNAL_MAX_PAGES` | Pages fetched per journal query | client default |
    /// | `SCHEDULER_TICK_SECS` | Seconds between delivery checks | `20` |
    /// | `LOOKBACK_DAYS` | Days of lessons scanned for homework | `31` |
    /// | `LOOKAHEAD_DAYS` | Days probed for the next school day | `14` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let telegram_token = var("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::MissingToken)?;

        let database_url = var("SQLITE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let tick_secs: u64 = parse_var(&var, "SCHEDULER_TICK_SECS")?.unwrap_or(DEFAULT_TICK_SECS);
        if tick_secs == 0 || tick_secs >= 60 {
            // Ticks of a minute or more can miss a slot's minute entirely.
            return Err(ConfigError::Invalid {
                key: "SCHEDULER_TICK_SECS",
                value: tick_secs.to_string(),
            });
        }

        let window = DeliveryWindow {
            lookback_days: parse_var(&var, "LOOKBACK_DAYS")?.unwrap_or(DEFAULT_LOOKBACK_DAYS),
            lookahead_days: parse_var(&var, "LOOKAHEAD_DAYS")?.unwrap_or(DEFAULT_LOOKAHEAD_DAYS),
        };

        Ok(Self {
            telegram_token,
            telegram_api_url: var("TELEGRAM_API_URL"),
            database_url,
            journal_api_url: var("JOURNAL_API_URL"),
            journal_max_pages: parse_var(&var, "JOURNAL_MAX_PAGES")?,
            tick_interval: Duration::from_secs(tick_secs),
            window,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                key,
                value: value.clone(),
            })
        })
        .transpose()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN environment variable is required")]
    MissingToken,

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}
