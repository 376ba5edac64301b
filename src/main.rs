//! Report bot - Telegram abuse report assistant
//!
//! Walks a user through naming a chat and a reason, classifies the chat and
//! replies with a ready-to-send report. The dialogue is a pure state machine
//! driven by a single runtime loop.

mod classifier;
mod config;
mod markup;
mod report;
mod runtime;
mod state_machine;
mod telegram;
mod transport;

use classifier::EntityClassifier;
use config::{BotConfig, DeliveryMode};
use runtime::{DialogRuntime, MemorySessionStore, ProductionRuntime};
use std::sync::Arc;
use telegram::TelegramClient;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::{polling, webhook};

/// Updates buffered between delivery and the runtime loop
const UPDATE_QUEUE: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "No .env file loaded");
    }

    // Configuration; missing credentials stop the process here
    let config = BotConfig::from_env()?;

    let client = Arc::new(TelegramClient::new(&config.api_base, &config.token)?);
    let username = client.get_me().await?;
    tracing::info!(bot = %username, "Authenticated with Bot API");

    let classifier = EntityClassifier::new(Arc::clone(&client), config.lookup_timeout);
    let runtime: ProductionRuntime =
        DialogRuntime::new(MemorySessionStore::new(), Arc::clone(&client), classifier);

    let (updates_tx, updates_rx) = mpsc::channel(UPDATE_QUEUE);
    let worker = tokio::spawn(runtime.run(updates_rx));

    match config.delivery {
        DeliveryMode::Polling { poll_timeout } => {
            tokio::select! {
                result = polling::run(client, poll_timeout, updates_tx) => result?,
                () = shutdown_signal() => {}
            }
        }
        DeliveryMode::Webhook {
            url,
            secret,
            listen,
        } => {
            webhook::run(
                client,
                &url,
                secret.as_deref(),
                listen,
                updates_tx,
                shutdown_signal(),
            )
            .await?;
        }
    }

    // All senders are gone; let the runtime finish the queued updates
    worker.await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
