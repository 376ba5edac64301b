//! Bot API wire types
//!
//! Only the fields the bot reads or writes are modelled; unknown fields are
//! ignored on decode.

use crate::classifier::{EntityKind, ResolvedEntity};
use crate::runtime::{Incoming, SessionKey};
use crate::state_machine::{Event, Keyboard};
use serde::{Deserialize, Serialize};

// ============================================================================
// Responses
// ============================================================================

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

// ============================================================================
// Updates
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl Update {
    /// Translate into a dialogue event; `None` for update types the bot ignores
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(query) = self.callback_query {
            let chat_id = query
                .message
                .as_ref()
                .map_or(query.from.id, |message| message.chat.id);
            return Some(Incoming {
                key: SessionKey::new(chat_id, query.from.id),
                event: Event::Selection {
                    token: query.data.unwrap_or_default(),
                    callback_id: query.id,
                },
            });
        }

        let message = self.message?;
        // Other bots (and channel posts without a sender) never drive a dialogue
        if message.from.as_ref().is_some_and(|user| user.is_bot) {
            return None;
        }
        let user_id = message.from.as_ref().map_or(message.chat.id, |user| user.id);
        let event = match message.text {
            Some(text) => Event::from_text(text),
            None => Event::NonText,
        };
        Some(Incoming {
            key: SessionKey::new(message.chat.id, user_id),
            event,
        })
    }
}

// ============================================================================
// Chat lookup
// ============================================================================

/// Subset of `ChatFullInfo` returned by `getChat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatInfo {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub title: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ChatInfo {
    /// Bot usernames must end in "bot"; `getChat` has no other bot marker
    pub fn is_bot(&self) -> bool {
        self.kind == EntityKind::Private
            && self
                .username
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with("bot"))
    }

    /// Display title: chat title, else the person's name, else the username
    pub fn display_title(&self) -> String {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            return name;
        }
        self.username.clone().unwrap_or_default()
    }
}

impl From<ChatInfo> for ResolvedEntity {
    fn from(info: ChatInfo) -> Self {
        ResolvedEntity {
            id: info.id,
            title: info.display_title(),
            kind: info.kind,
            is_bot: info.is_bot(),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub link_preview_options: LinkPreviewOptions,
}

#[derive(Debug, Serialize)]
pub struct LinkPreviewOptions {
    pub is_disabled: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: button.caption.clone(),
                            callback_data: button.token.clone(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct SetWebhookRequest<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_token: Option<&'a str>,
    pub allowed_updates: &'static [&'static str],
    pub drop_pending_updates: bool,
}

/// Update kinds the bot subscribes to
pub const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];
