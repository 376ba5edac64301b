//! Update delivery
//!
//! Both modes decode Bot API updates and push them onto the runtime's
//! channel; neither touches dialogue state.

pub mod polling;
pub mod webhook;

use crate::telegram::TelegramError;
use std::net::SocketAddr;
use thiserror::Error;

/// Startup failures of a delivery mode; all of them are fatal
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to register webhook: {0}")]
    Registration(#[source] TelegramError),
    #[error("failed to switch to polling: {0}")]
    PollingSetup(#[source] TelegramError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("webhook server failed: {0}")]
    Serve(#[source] std::io::Error),
}
