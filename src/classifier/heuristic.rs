//! String-shape classification used when the lookup is unavailable

use super::normalize::{is_invite, telegram_link_segments};
use super::{ChatType, Classification};

/// Classify purely from the shape of the identifier. Never fails.
pub fn classify_heuristic(raw: &str) -> Classification {
    let raw = raw.trim();

    if let Some(segments) = telegram_link_segments(raw) {
        if is_invite(&segments) {
            return Classification::new(ChatType::Group);
        }
        let segment = segments.last().map_or("", String::as_str);
        return match segment.strip_prefix('@') {
            Some(name) => Classification::new(ChatType::BotOrChannelUsername).with_title(name),
            None => Classification::new(ChatType::BotOrChannelLink).with_title(segment),
        };
    }

    if let Some(name) = raw.strip_prefix('@') {
        return Classification::new(ChatType::BotOrChannelUsername).with_title(name);
    }

    let unknown = Classification::new(ChatType::Unknown);
    if is_numeric_id(raw) {
        unknown.with_id(raw)
    } else {
        unknown
    }
}

fn is_numeric_id(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
