//! Inbound messages and the commands parsed from them.

/// A text message received from a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Messaging user id of the author, for logs.
    pub sender_id: i64,
    /// Chat the message came from; identifies the recipient.
    pub chat_id: i64,
    pub text: String,
}

impl InboundMessage {
    pub fn new(sender_id: i64, chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            chat_id,
            text: text.into(),
        }
    }

    /// A message in the sender's private chat.
    pub fn direct(sender_id: i64, text: impl Into<String>) -> Self {
        Self::new(sender_id, sender_id, text)
    }

    /// Recipient the message belongs to.
    ///
    /// Recipients are keyed by chat, so a group is one recipient no matter
    /// who writes in it, and the id is also where digests are delivered.
    pub fn recipient_id(&self) -> i64 {
        self.chat_id
    }
}

/// Usage line for the credential command.
pub const TOKEN_USAGE: &str = "Usage: /token <journal token>";

/// Usage line for the delivery time command.
pub const TIME_USAGE: &str = "Usage: /time <mon|tue|wed|thu|fri|sat|sun> <HH:MM>, or 25:00 to turn the day off";

/// A recipient command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `reset`.
    Reset,
    /// `/token <t>` or `set-credential <t>`.
    SetCredential(String),
    /// `/time <weekday> <time>` or `set-time ...`; arguments unvalidated.
    SetTime { weekday: String, time: String },
    /// `/homework` or `request-homework`.
    RequestHomework,
    /// `/schedule`.
    ListSchedule,
    /// `/help`.
    Help,
    /// A known command with missing arguments; carries its usage line.
    Malformed(&'static str),
    /// A slash command nobody handles.
    Unknown(String),
    /// Anything that is not a command.
    Text(String),
}

impl Command {
    /// Parse a message text.
    ///
    /// Slash commands may carry a `@botname` suffix and are matched
    /// case-insensitively, as are the verb forms.
    pub fn parse(text: &str) -> Self {
        let (head, rest) = split_command(text);
        let is_slash = head.starts_with('/');
        let name = head
            .trim_start_matches('/')
            .split('@')
            .next()
            .unwrap_or("")
            .to_lowercase();

        match (is_slash, name.as_str()) {
            (true, "start") | (false, "reset") => Command::Reset,
            (true, "token") | (false, "set-credential") => match rest.split_whitespace().last() {
                Some(token) => Command::SetCredential(token.to_string()),
                None => Command::Malformed(TOKEN_USAGE),
            },
            (true, "time") | (false, "set-time") => {
                let args: Vec<&str> = rest.split_whitespace().collect();
                match args.as_slice() {
                    [weekday, time] => Command::SetTime {
                        weekday: weekday.to_string(),
                        time: time.to_string(),
                    },
                    _ => Command::Malformed(TIME_USAGE),
                }
            }
            (true, "homework") | (false, "request-homework") => Command::RequestHomework,
            (true, "schedule") => Command::ListSchedule,
            (true, "help") | (false, "help") => Command::Help,
            (true, _) => Command::Unknown(head.to_string()),
            (false, _) => Command::Text(text.trim().to_string()),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Reset => "reset",
            Command::SetCredential(_) => "set-credential",
            Command::SetTime { .. } => "set-time",
            Command::RequestHomework => "request-homework",
            Command::ListSchedule => "schedule",
            Command::Help => "help",
            Command::Malformed(_) => "malformed",
            Command::Unknown(_) => "unknown",
            Command::Text(_) => "text",
        }
    }
}

fn split_command(text: &str) -> (&str, &str) {
    let trimmed = text.trim();
    let mut parts = trimmed.splitn(2, |c: char| c.is_whitespace());
    let command = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();
    (command, rest)
}
