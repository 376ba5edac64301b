//! Events that can occur in a report dialogue

/// Bot commands recognized by the dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Report,
    Cancel,
    /// Any other `/word`, kept for logging
    Unknown(String),
}

impl Command {
    /// Parse a command from message text.
    ///
    /// Returns `None` when the text is not a command at all. The `@botname`
    /// suffix Telegram appends in group chats is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.trim_start().split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        if name.is_empty() {
            return None;
        }

        Some(match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "report" => Command::Report,
            "cancel" => Command::Cancel,
            other => Command::Unknown(other.to_string()),
        })
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A slash command
    Command(Command),

    /// Plain text message
    Text(String),

    /// Category button pressed
    Selection { token: String, callback_id: String },

    /// Sticker, photo, voice note or anything else without text
    NonText,
}

impl Event {
    /// Classify a text message as a command or free text
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        match Command::parse(&text) {
            Some(command) => Event::Command(command),
            None => Event::Text(text),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Command(_) => "command",
            Event::Text(_) => "text",
            Event::Selection { .. } => "selection",
            Event::NonText => "non_text",
        }
    }
}
