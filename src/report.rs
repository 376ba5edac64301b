//! Report text synthesis
//!
//! Pure formatting of a finished dialogue plus its classification into the
//! fixed `MarkdownV2` report template.

use crate::classifier::{Classification, NONE_PLACEHOLDER};
use crate::markup::{bold, code, escape, escape_within, message_len, MESSAGE_LIMIT};
use crate::state_machine::reason::OTHER_PLACEHOLDER;
use crate::state_machine::ReportDraft;

const HEADER: &str = "Report";

const DESCRIPTION: &str = "I am reporting this chat because it violates the Telegram \
                           Terms of Service. Please review it.";

/// Reporter contact details the bot has no way to collect
const NOT_AVAILABLE: &str = "Not Available";
const CONTACT_FIELDS: [&str; 4] = ["Name:", "Address:", "Phone:", "E-Mail:"];

const CLOSING: &str = "Thank you for your attention.";

/// Build the report text. Deterministic, no side effects.
///
/// The result always fits in one message: when the user's free text would
/// push it past [`MESSAGE_LIMIT`], that text is shortened.
pub fn synthesize(draft: &ReportDraft, classification: &Classification) -> String {
    let full = render(
        draft,
        classification,
        &escape(category(draft)),
        &escape(&draft.detailed_reason),
    );
    if message_len(&full) <= MESSAGE_LIMIT {
        return full;
    }

    let frame = render(draft, classification, "", "");
    let budget = MESSAGE_LIMIT.saturating_sub(message_len(&frame));
    let (category, details) = if draft.reason_type.as_deref() == Some(OTHER_PLACEHOLDER) {
        // The free text appears twice
        let shortened = escape_within(&draft.detailed_reason, budget / 2);
        (shortened.clone(), shortened)
    } else {
        let category = escape(category(draft));
        let details = escape_within(
            &draft.detailed_reason,
            budget.saturating_sub(message_len(&category)),
        );
        (category, details)
    };
    render(draft, classification, &category, &details)
}

fn render(
    draft: &ReportDraft,
    classification: &Classification,
    category: &str,
    details: &str,
) -> String {
    let mut lines = vec![
        bold(HEADER),
        String::new(),
        escape(DESCRIPTION),
        String::new(),
        field("Chat Type:", &escape(classification.chat_type.as_str())),
        field("Chat Title:", &escape(classification.title())),
        field("Chat ID:", &escape(classification.id())),
        field("Chat Link:", &code(&draft.report_link)),
        field("Relevant:", category),
        field("Details:", details),
        String::new(),
    ];
    lines.extend(
        CONTACT_FIELDS
            .iter()
            .map(|label| field(label, &escape(NOT_AVAILABLE))),
    );
    lines.push(String::new());
    lines.push(escape(CLOSING));
    lines.join("\n")
}

/// Category line: the chosen label, or the user's own words for `Other`
fn category(draft: &ReportDraft) -> &str {
    match draft.reason_type.as_deref() {
        Some(OTHER_PLACEHOLDER) => &draft.detailed_reason,
        Some(label) => label,
        None => NONE_PLACEHOLDER,
    }
}

fn field(label: &str, value: &str) -> String {
    format!("{} {value}", bold(label))
}
