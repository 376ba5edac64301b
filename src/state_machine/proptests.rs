//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::effect::ReportDraft;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ReportReason::Spam.token()),
        Just(ReportReason::IllegalContent.token()),
        Just(ReportReason::Phishing.token()),
        Just(ReportReason::AdultContent.token()),
        Just(ReportReason::Other.token()),
        "reason_[a-z_]{1,12}",
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::Start),
        Just(Command::Help),
        Just(Command::Report),
        Just(Command::Cancel),
        "[a-z]{1,8}".prop_map(Command::Unknown),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_command().prop_map(Event::Command),
        "[a-zA-Z0-9@:/._ ]{0,40}".prop_map(Event::Text),
        (arb_token(), "[a-z0-9]{6}")
            .prop_map(|(token, callback_id)| Event::Selection { token, callback_id }),
        Just(Event::NonText),
    ]
}

fn arb_session() -> impl Strategy<Value = Session> {
    let link = proptest::option::of("@[a-z_]{3,12}");
    let reason = proptest::option::of(prop_oneof![
        Just("Spam".to_string()),
        Just("Other".to_string())
    ]);
    prop_oneof![
        Just(Session::default()),
        Just(Session::started()),
        ("@[a-z_]{3,12}", reason).prop_map(|(link, reason)| Session {
            state: DialogState::AwaitingReason,
            report_link: Some(link),
            reason_type: reason,
            detailed_reason: None,
        }),
        link.prop_map(|link| Session {
            report_link: link,
            ..Session::started()
        }),
    ]
}

/// A category selection that leads the dialogue down one of its two branches
fn arb_reason_path() -> impl Strategy<Value = ReportReason> {
    prop_oneof![
        Just(ReportReason::Spam),
        Just(ReportReason::IllegalContent),
        Just(ReportReason::Phishing),
        Just(ReportReason::AdultContent),
        Just(ReportReason::Other),
    ]
}

fn run(events: Vec<Event>) -> (Session, Vec<Effect>) {
    let mut session = Session::default();
    let mut effects = Vec::new();
    for event in events {
        let result = transition(&session, event);
        session = result.new_session;
        effects.extend(result.effects);
    }
    (session, effects)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_transition_is_deterministic(session in arb_session(), event in arb_event()) {
        let first = transition(&session, event.clone());
        let second = transition(&session, event);
        prop_assert_eq!(first.new_session, second.new_session);
        prop_assert_eq!(first.effects, second.effects);
    }

    #[test]
    fn prop_every_event_gets_a_response(session in arb_session(), event in arb_event()) {
        let result = transition(&session, event);
        prop_assert!(!result.effects.is_empty());
    }

    #[test]
    fn prop_selection_is_always_acknowledged(session in arb_session(), token in arb_token()) {
        let result = transition(&session, Event::Selection { token, callback_id: "cb".into() });
        prop_assert!(
            matches!(result.effects.first(), Some(Effect::AcknowledgeSelection { .. })),
            "first effect must acknowledge the button press"
        );
    }

    #[test]
    fn prop_cancel_always_clears(session in arb_session()) {
        let result = transition(&session, Event::Command(Command::Cancel));
        prop_assert!(result.new_session.is_cleared());
    }

    #[test]
    fn prop_report_always_starts_fresh(session in arb_session()) {
        let result = transition(&session, Event::Command(Command::Report));
        prop_assert_eq!(result.new_session, Session::started());
    }

    #[test]
    fn prop_idle_never_holds_fields(session in arb_session(), events in proptest::collection::vec(arb_event(), 0..12)) {
        let mut session = session;
        for event in events {
            session = transition(&session, event).new_session;
            if session.state == DialogState::Idle {
                prop_assert!(session.is_cleared());
            }
        }
    }

    #[test]
    fn prop_full_flow_ends_idle_and_cleared(
        link in "@[a-zA-Z0-9_]{3,20}",
        reason in arb_reason_path(),
        details in "[a-zA-Z][a-zA-Z ]{0,40}",
    ) {
        let (session, effects) = run(vec![
            Event::Command(Command::Report),
            Event::Text(link.clone()),
            Event::Selection { token: reason.token(), callback_id: "cb".into() },
            Event::Text(details.clone()),
        ]);

        prop_assert!(session.is_cleared());
        prop_assert_eq!(session.state, DialogState::Idle);

        let drafts: Vec<&ReportDraft> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::GenerateReport { draft } => Some(draft),
                _ => None,
            })
            .collect();
        prop_assert_eq!(drafts.len(), 1);
        prop_assert_eq!(&drafts[0].report_link, &link);
        prop_assert_eq!(drafts[0].reason_type.clone(), Some(reason.label()));
        prop_assert_eq!(&drafts[0].detailed_reason, details.trim());
    }

    #[test]
    fn prop_cancel_then_report_has_no_residue(
        link in "@[a-z_]{3,12}",
        reason in arb_reason_path(),
    ) {
        let (session, _) = run(vec![
            Event::Command(Command::Report),
            Event::Text(link),
            Event::Selection { token: reason.token(), callback_id: "cb".into() },
            Event::Command(Command::Cancel),
            Event::Command(Command::Report),
        ]);
        prop_assert_eq!(session, Session::started());
    }
}
