//! Environment configuration

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_PORT: u16 = 8443;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// How updates reach the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Long polling with `getUpdates`
    Polling { poll_timeout: Duration },
    /// Telegram pushes updates to a registered URL
    Webhook {
        url: String,
        secret: Option<String>,
        listen: SocketAddr,
    },
}

/// Bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub api_base: String,
    pub lookup_timeout: Duration,
    pub delivery: DeliveryMode,
}

impl BotConfig {
    /// Load from the process environment (after `.env`, if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = var("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let api_base = var("TELEGRAM_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let lookup_timeout = Duration::from_secs(parse_secs(
            "LOOKUP_TIMEOUT_SECS",
            var("LOOKUP_TIMEOUT_SECS"),
            DEFAULT_LOOKUP_TIMEOUT_SECS,
        )?);

        let delivery = match var("WEBHOOK_URL") {
            Some(url) => {
                if !url.starts_with("https://") {
                    return Err(ConfigError::Invalid {
                        name: "WEBHOOK_URL",
                        value: url,
                        reason: "Telegram only delivers webhooks over https",
                    });
                }
                let port = match var("PORT") {
                    Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                        name: "PORT",
                        value: raw,
                        reason: "expected a port number",
                    })?,
                    None => DEFAULT_PORT,
                };
                let ip = match var("BIND_ADDR") {
                    Some(raw) => raw.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
                        name: "BIND_ADDR",
                        value: raw,
                        reason: "expected an IP address",
                    })?,
                    None => IpAddr::from([0, 0, 0, 0]),
                };
                DeliveryMode::Webhook {
                    url,
                    secret: var("WEBHOOK_SECRET"),
                    listen: SocketAddr::new(ip, port),
                }
            }
            None => DeliveryMode::Polling {
                poll_timeout: Duration::from_secs(parse_secs(
                    "POLL_TIMEOUT_SECS",
                    var("POLL_TIMEOUT_SECS"),
                    DEFAULT_POLL_TIMEOUT_SECS,
                )?),
            },
        };

        Ok(Self {
            token,
            api_base,
            lookup_timeout,
            delivery,
        })
    }
}

fn parse_secs(name: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw,
            reason: "expected a positive number of seconds",
        }),
    }
}
