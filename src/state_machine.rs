//! Report dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition(session, event)` yields the next session and a list of
//! effects that the runtime executes.

mod effect;
pub mod event;
pub mod reason;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Button, Effect, Keyboard, ReportDraft};
pub use event::{Command, Event};
pub use reason::ReportReason;
pub use state::{DialogState, Session};
pub use transition::transition;
