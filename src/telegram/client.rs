//! HTTP client for the Telegram Bot API

use super::types::{
    ApiResponse, ChatInfo, GetUpdatesRequest, InlineKeyboardMarkup, LinkPreviewOptions,
    SendMessageRequest, SetWebhookRequest, Update, ALLOWED_UPDATES,
};
use super::{TelegramError, TelegramErrorKind};
use crate::classifier::{EntityResolver, Identifier, ResolveError, ResolvedEntity};
use crate::runtime::Messenger;
use crate::state_machine::Keyboard;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::{Duration, Instant};

/// Default timeout for regular (non long-poll) requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra time granted to `getUpdates` beyond its server-side long-poll timeout
const LONG_POLL_GRACE: Duration = Duration::from_secs(10);

/// Bot API client bound to one bot token
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_base.trim_end_matches('/')),
        })
    }

    /// Call a Bot API method and unwrap the response envelope
    async fn call<B, T>(
        &self,
        method: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let start = Instant::now();
        let mut request = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response: ApiResponse<T> = request.send().await?.json().await?;
        let duration_ms = start.elapsed().as_millis();

        if response.ok {
            tracing::debug!(method, duration_ms = %duration_ms, "Bot API call completed");
            return response
                .result
                .ok_or_else(|| TelegramError::decode(format!("{method}: ok response without result")));
        }

        let description = response
            .description
            .unwrap_or_else(|| "no description".to_string());
        tracing::warn!(
            method,
            duration_ms = %duration_ms,
            error_code = ?response.error_code,
            error = %description,
            "Bot API call failed"
        );
        let mut error = TelegramError::api(response.error_code, format!("{method}: {description}"));
        if let Some(retry_after) = response.parameters.and_then(|p| p.retry_after) {
            error = error.with_retry_after(Duration::from_secs(retry_after));
        }
        Err(error)
    }

    /// Verify the token and return the bot's username
    pub async fn get_me(&self) -> Result<String, TelegramError> {
        #[derive(serde::Deserialize)]
        struct Me {
            username: Option<String>,
        }
        let me: Me = self.call("getMe", &json!({}), None).await?;
        Ok(me.username.unwrap_or_default())
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: poll_timeout.as_secs(),
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("getUpdates", &body, Some(poll_timeout + LONG_POLL_GRACE))
            .await
    }

    /// Look up a chat by `@username` or numeric id
    pub async fn get_chat(&self, chat_id: &str) -> Result<ChatInfo, TelegramError> {
        self.call("getChat", &json!({ "chat_id": chat_id }), None)
            .await
    }

    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), TelegramError> {
        let body = SetWebhookRequest {
            url,
            secret_token,
            allowed_updates: ALLOWED_UPDATES,
            drop_pending_updates: false,
        };
        let _: bool = self.call("setWebhook", &body, None).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self
            .call("deleteWebhook", &json!({ "drop_pending_updates": false }), None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode: "MarkdownV2",
            reply_markup: keyboard.map(InlineKeyboardMarkup::from),
            link_preview_options: LinkPreviewOptions { is_disabled: true },
        };
        let _: serde_json::Value = self.call("sendMessage", &body, None).await?;
        Ok(())
    }

    async fn answer_selection(&self, callback_id: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_id }),
                None,
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EntityResolver for TelegramClient {
    async fn resolve(&self, identifier: &Identifier) -> Result<ResolvedEntity, ResolveError> {
        let key = identifier.as_lookup_key();
        match self.get_chat(&key).await {
            Ok(info) => Ok(info.into()),
            Err(e) if e.is_not_found() => Err(ResolveError::NotFound(key)),
            Err(e) => Err(ResolveError::Unavailable(match e.kind {
                TelegramErrorKind::Timeout => format!("timed out: {e}"),
                _ => e.to_string(),
            })),
        }
    }
}
