//! Telegram Bot API adapter
//!
//! Implements the outbound [`Messenger`](crate::runtime::Messenger) and the
//! [`EntityResolver`](crate::classifier::EntityResolver) collaborators on top
//! of the HTTP Bot API, plus the update types both delivery modes decode.

mod client;
mod error;
mod types;

pub use client::TelegramClient;
pub use error::{TelegramError, TelegramErrorKind};
pub use types::*;
