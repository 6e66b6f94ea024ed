//! Minimal Bot API client over plain HTTP.

use crate::api::{ApiResponse, Message, Update};
use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// API host, default `https://api.telegram.org`. Overridable so tests
    /// can point the client at a stub.
    pub api_url: String,
    pub token: String,
    /// Long-poll hold time for `getUpdates`.
    pub poll_timeout: Duration,
    /// Timeout for everything except the long-poll hold.
    pub http_timeout: Duration,
}

pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> anyhow::Result<Self> {
        // One client for everything, so the timeout must cover a full
        // long-poll hold plus transport overhead.
        let http = reqwest::Client::builder()
            .timeout(config.poll_timeout + config.http_timeout)
            .build()
            .context("failed to build telegram http client")?;
        let base = format!("{}/bot{}", config.api_url.trim_end_matches('/'), config.token);

        Ok(Self {
            http,
            base,
            poll_timeout_secs: config.poll_timeout.as_secs(),
        })
    }

    /// Long-polls for updates starting at `offset`. Returns as soon as
    /// something arrives, or empty after the hold time.
    pub async fn get_updates(&self, offset: i64) -> anyhow::Result<Vec<Update>> {
        let response = self
            .http
            .get(format!("{}/getUpdates", self.base))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", self.poll_timeout_secs.to_string()),
            ])
            .send()
            .await
            .context("getUpdates request failed")?;
        Self::unwrap_response(response).await
    }

    /// Fetches and discards whatever queued up while the bot was offline,
    /// returning the offset to poll from. Stale commands are not worth
    /// answering minutes later.
    pub async fn drain_pending(&self) -> anyhow::Result<i64> {
        let mut offset = 0;
        let mut dropped = 0usize;
        loop {
            let response = self
                .http
                .get(format!("{}/getUpdates", self.base))
                .query(&[("offset", offset.to_string()), ("timeout", "0".to_string())])
                .send()
                .await
                .context("getUpdates drain request failed")?;
            let updates: Vec<Update> = Self::unwrap_response(response).await?;
            match updates.last() {
                None => break,
                Some(last) => {
                    offset = last.update_id + 1;
                    dropped += updates.len();
                }
            }
        }
        if dropped > 0 {
            info!(count = dropped, "dropped pending updates");
        }
        Ok(offset)
    }

    /// Retries [`Self::drain_pending`] up to `attempts` times, sleeping
    /// `delay` between failures.
    pub async fn drain_pending_with_retry(
        &self,
        attempts: u32,
        delay: Duration,
    ) -> anyhow::Result<i64> {
        let mut attempt = 1;
        loop {
            match self.drain_pending().await {
                Ok(offset) => return Ok(offset),
                Err(err) if attempt < attempts => {
                    warn!("draining pending updates failed (attempt {}): {:#}", attempt, err);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<Message> {
        let response = self
            .http
            .post(format!("{}/sendMessage", self.base))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .context("sendMessage request failed")?;
        Self::unwrap_response(response).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> anyhow::Result<Message> {
        let response = self
            .http
            .post(format!("{}/editMessageText", self.base))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "text": text,
            }))
            .send()
            .await
            .context("editMessageText request failed")?;
        Self::unwrap_response(response).await
    }

    async fn unwrap_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> anyhow::Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read telegram response")?;
        let parsed: ApiResponse<T> = serde_json::from_str(&body)
            .with_context(|| format!("invalid telegram response ({}): {}", status, body))?;

        if !parsed.ok {
            bail!(
                "telegram api error: {}",
                parsed.description.unwrap_or_else(|| format!("http {}", status))
            );
        }
        parsed
            .result
            .ok_or_else(|| anyhow!("telegram response missing result"))
    }
}
