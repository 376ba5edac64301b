//! Long-polling delivery

use super::TransportError;
use crate::runtime::Incoming;
use crate::telegram::TelegramClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Poll `getUpdates` until the runtime stops accepting updates.
///
/// Errors while polling are never fatal; they back off and retry.
pub async fn run(
    client: Arc<TelegramClient>,
    poll_timeout: Duration,
    updates: mpsc::Sender<Incoming>,
) -> Result<(), TransportError> {
    // getUpdates is refused while a webhook is registered
    client
        .delete_webhook()
        .await
        .map_err(TransportError::PollingSetup)?;
    tracing::info!(poll_timeout_secs = poll_timeout.as_secs(), "Polling for updates");

    let mut offset = None;
    let mut backoff = INITIAL_BACKOFF;
    loop {
        match client.get_updates(offset, poll_timeout).await {
            Ok(batch) => {
                backoff = INITIAL_BACKOFF;
                for update in batch {
                    offset = Some(update.update_id + 1);
                    let Some(incoming) = update.into_incoming() else {
                        continue;
                    };
                    if updates.send(incoming).await.is_err() {
                        tracing::info!("Runtime closed, stopping poller");
                        return Ok(());
                    }
                }
            }
            Err(e) => {
                let delay = e.retry_after.unwrap_or(backoff);
                tracing::warn!(
                    error = %e,
                    retryable = e.kind.is_retryable(),
                    delay_ms = %delay.as_millis(),
                    "getUpdates failed, backing off"
                );
                tokio::time::sleep(delay).await;
                backoff = next_backoff(backoff);
            }
        }
    }
}

/// Exponential backoff: 1s, 2s, 4s ... capped at 30s
fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}
