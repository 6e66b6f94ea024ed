//! OpenAI-compatible chat-completions adapter for the narrative summary.

use crate::prompt::{snapshot_prompt, SYSTEM_PROMPT};
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde_json::json;
use skywatch_domain::{DomainError, DomainResult, NarrativeGenerator, Snapshot};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// Base URL of the OpenAI-compatible API, e.g.
    /// `https://api.groq.com/openai/v1`
    pub api_url: String,
    /// Empty key disables the backend; callers fall back to the static
    /// sentence.
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct GroqNarrativeGenerator {
    http: reqwest::Client,
    config: GroqConfig,
}

impl GroqNarrativeGenerator {
    pub fn new(config: GroqConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build groq http client")?;
        Ok(Self { http, config })
    }

    pub fn has_credentials(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.3,
            "max_tokens": 120,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("chat completion returned {}: {}", status, body);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("chat completion returned invalid json")?;
        extract_content(&body)
    }
}

/// Pulls the generated sentence out of a chat-completions response.
fn extract_content(response: &serde_json::Value) -> anyhow::Result<String> {
    response
        .pointer("/choices/0/message/content")
        .and_then(|content| content.as_str())
        .map(|content| content.trim().to_string())
        .ok_or_else(|| anyhow!("chat completion response missing message content"))
}

#[async_trait]
impl NarrativeGenerator for GroqNarrativeGenerator {
    #[instrument(skip(self, snapshot))]
    async fn summarize(&self, snapshot: &Snapshot) -> DomainResult<String> {
        if !self.has_credentials() {
            return Err(DomainError::NarrativeCredentialsMissing);
        }

        let prompt = snapshot_prompt(snapshot);
        let sentence = self
            .complete(&prompt)
            .await
            .map_err(|e| DomainError::NarrativeError(e.to_string()))?;
        debug!(length = sentence.len(), "narrative generated");
        Ok(sentence)
    }
}
