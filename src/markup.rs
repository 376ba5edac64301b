//! Telegram MarkdownV2 helpers
//!
//! Every outbound message is sent with `parse_mode = MarkdownV2`, so any
//! user-controlled or literal text must go through [`escape`] before it is
//! interpolated.

/// Maximum `sendMessage` text length, in UTF-16 code units
pub const MESSAGE_LIMIT: usize = 4096;

/// Marker appended to text shortened by [`escape_within`]
const ELLIPSIS: char = '\u{2026}';

/// Characters that must be backslash-escaped outside of code entities
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Escape text for use outside of code spans
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Length as Telegram counts it
pub fn message_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Escape text, cutting it short so the result stays within `budget`
/// (measured with [`message_len`]). A shortened result ends with an ellipsis.
pub fn escape_within(text: &str, budget: usize) -> String {
    let escaped = escape(text);
    if message_len(&escaped) <= budget {
        return escaped;
    }

    let limit = budget.saturating_sub(ELLIPSIS.len_utf16());
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let width = c.len_utf16() + usize::from(RESERVED.contains(&c));
        if used + width > limit {
            break;
        }
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
        used += width;
    }
    if budget > 0 {
        out.push(ELLIPSIS);
    }
    out
}

/// Bold text; the content is escaped
pub fn bold(text: &str) -> String {
    format!("*{}*", escape(text))
}

/// Inline code span.
///
/// Inside code entities only `` ` `` and `\` are special, so the content is
/// otherwise kept verbatim.
pub fn code(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('`');
    for c in text.chars() {
        if c == '`' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('`');
    out
}
