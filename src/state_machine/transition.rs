//! Pure state transition function
//!
//! Given the same session and event this always produces the same next
//! session and effects. No I/O happens here; chat lookups and message
//! delivery are carried out by the runtime.

use super::effect::ReportDraft;
use super::reason::ReportReason;
use super::{Command, DialogState, Effect, Event, Session};
use crate::markup::{bold, code, escape};

/// Greetings answered with the welcome text while idle (matched lowercase)
const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "hola",
    "hii",
    "greetings",
    "good morning",
    "good evening",
];

/// Longest accepted chat username or link, in characters
pub const MAX_LINK_CHARS: usize = 256;

/// Longest accepted explanation, in characters
pub const MAX_DETAIL_CHARS: usize = 2000;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function
pub fn transition(session: &Session, event: Event) -> TransitionResult {
    match (session.state, event) {
        // ============================================================
        // Commands available everywhere
        // ============================================================
        (_, Event::Command(Command::Start)) => {
            TransitionResult::new(session.clone()).with_effect(Effect::reply(welcome_text()))
        }

        (_, Event::Command(Command::Help)) => {
            TransitionResult::new(session.clone()).with_effect(Effect::reply(help_text()))
        }

        // Starting a report always begins from an empty session
        (_, Event::Command(Command::Report)) => {
            TransitionResult::new(Session::started()).with_effect(Effect::reply(ask_link_text()))
        }

        (DialogState::Idle, Event::Command(Command::Cancel)) => TransitionResult::new(
            Session::default(),
        )
        .with_effect(Effect::reply_plain("There is no report in progress.")),

        (_, Event::Command(Command::Cancel)) => TransitionResult::new(Session::default())
            .with_effect(Effect::reply_plain(
                "Report cancelled. Send /report to start again.",
            )),

        // ============================================================
        // Idle
        // ============================================================
        (DialogState::Idle, Event::Text(text)) if is_greeting(&text) => {
            TransitionResult::new(session.clone()).with_effect(Effect::reply(welcome_text()))
        }

        (DialogState::Idle, Event::Text(_) | Event::NonText | Event::Command(Command::Unknown(_))) => {
            TransitionResult::new(session.clone()).with_effect(Effect::reply(not_understood_text()))
        }

        // Button from a finished or cancelled dialogue
        (DialogState::Idle, Event::Selection { callback_id, .. }) => {
            TransitionResult::new(session.clone())
                .with_effect(Effect::acknowledge(callback_id))
                .with_effect(Effect::reply_plain(
                    "This menu is no longer active. Send /report to start a new report.",
                ))
        }

        // ============================================================
        // AwaitingLink
        // ============================================================
        (DialogState::AwaitingLink, Event::Text(text)) => {
            let link = text.trim();
            if link.is_empty() {
                return TransitionResult::new(session.clone())
                    .with_effect(Effect::reply(link_reprompt_text()));
            }
            if link.chars().count() > MAX_LINK_CHARS {
                return TransitionResult::new(session.clone())
                    .with_effect(Effect::reply_plain(&too_long_text("link", MAX_LINK_CHARS)));
            }
            TransitionResult::new(session.clone().with_link(link))
                .with_effect(Effect::reply_with_reasons(ask_reason_text()))
        }

        (DialogState::AwaitingLink, Event::Selection { callback_id, .. }) => {
            TransitionResult::new(session.clone())
                .with_effect(Effect::acknowledge(callback_id))
                .with_effect(Effect::reply(link_reprompt_text()))
        }

        (DialogState::AwaitingLink, Event::NonText | Event::Command(Command::Unknown(_))) => {
            TransitionResult::new(session.clone()).with_effect(Effect::reply(link_reprompt_text()))
        }

        // ============================================================
        // AwaitingReason
        // ============================================================
        (DialogState::AwaitingReason, Event::Selection { token, callback_id }) => {
            let ack = Effect::acknowledge(callback_id);
            match ReportReason::from_token(&token) {
                Some(ReportReason::Other) => {
                    TransitionResult::new(session.clone().with_reason_type(ReportReason::Other.label()))
                        .with_effect(ack)
                        .with_effect(Effect::reply_plain(
                            "Please describe in your own words why this chat should be reported.",
                        ))
                }
                Some(reason) => {
                    let label = reason.label();
                    let text = format!(
                        "{} {}\n{}",
                        escape("Category:"),
                        bold(&label),
                        escape("Now briefly explain what is wrong with this chat.")
                    );
                    TransitionResult::new(session.clone().with_reason_type(label))
                        .with_effect(ack)
                        .with_effect(Effect::reply(text))
                }
                None => TransitionResult::new(session.clone())
                    .with_effect(ack)
                    .with_effect(Effect::reply_with_reasons(reason_reprompt_text())),
            }
        }

        (DialogState::AwaitingReason, Event::Text(text)) => {
            let detailed_reason = text.trim();
            if detailed_reason.is_empty() {
                return TransitionResult::new(session.clone())
                    .with_effect(Effect::reply_with_reasons(reason_reprompt_text()));
            }
            if detailed_reason.chars().count() > MAX_DETAIL_CHARS {
                return TransitionResult::new(session.clone()).with_effect(Effect::reply_plain(
                    &too_long_text("explanation", MAX_DETAIL_CHARS),
                ));
            }
            let completed = session.clone().with_details(detailed_reason);
            match ReportDraft::from_session(&completed) {
                Some(draft) => TransitionResult::new(Session::default())
                    .with_effect(Effect::generate_report(draft)),
                // A reason without a target cannot become a report; restart at the link step
                None => TransitionResult::new(Session::started())
                    .with_effect(Effect::reply(ask_link_text())),
            }
        }

        (DialogState::AwaitingReason, Event::NonText | Event::Command(Command::Unknown(_))) => {
            TransitionResult::new(session.clone())
                .with_effect(Effect::reply_with_reasons(reason_reprompt_text()))
        }
    }
}

fn is_greeting(text: &str) -> bool {
    let normalized = text
        .trim()
        .trim_end_matches(['!', '.', '?'])
        .to_lowercase();
    GREETINGS.contains(&normalized.as_str())
}

// ============================================================================
// Prompts
// ============================================================================

fn welcome_text() -> String {
    format!(
        "{}\n\n{}",
        bold("Welcome!"),
        escape(
            "I help you write a report about a chat, channel, group or bot that breaks \
             the Telegram Terms of Service. Send /report to start or /help to see all commands."
        )
    )
}

fn help_text() -> String {
    [
        bold("Commands"),
        escape("/report - start a new report"),
        escape("/cancel - abort the report in progress"),
        escape("/help - show this message"),
    ]
    .join("\n")
}

fn not_understood_text() -> String {
    escape("Sorry, I didn't understand that. Send /report to start a report or /help for help.")
}

fn ask_link_text() -> String {
    format!(
        "{} {} {} {} {} {} {} {}{}",
        escape("Send the"),
        bold("username"),
        escape("or"),
        bold("link"),
        escape("of the chat you want to report, for example"),
        code("@example"),
        escape("or"),
        code("https://t.me/example"),
        escape("."),
    )
}

fn link_reprompt_text() -> String {
    escape("Please send the username or link of the chat as a text message.")
}

fn ask_reason_text() -> String {
    escape("Why are you reporting this chat? Choose a category:")
}

fn too_long_text(what: &str, max: usize) -> String {
    format!(
        "That {what} is too long. Please keep it to at most {max} characters and send it again."
    )
}

fn reason_reprompt_text() -> String {
    escape("Please choose one of the categories below or type your explanation.")
}
