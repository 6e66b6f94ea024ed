//! Thin HTTP client for the InfluxDB 2.x API.

use anyhow::{bail, Context};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct InfluxConfig {
    /// Base URL, e.g. `http://localhost:8086`
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    /// Measurement the MQTT consumer writes readings under
    pub measurement: String,
    pub timeout: Duration,
}

pub struct InfluxClient {
    http: reqwest::Client,
    config: InfluxConfig,
}

impl InfluxClient {
    pub fn new(config: InfluxConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build influxdb http client")?;
        Ok(Self { http, config })
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    pub fn measurement(&self) -> &str {
        &self.config.measurement
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    pub fn org(&self) -> &str {
        &self.config.org
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    /// Connectivity probe: lists the buckets the token can see. Used at
    /// startup; an error here means the store is unreachable or the
    /// credentials are wrong.
    pub async fn list_buckets(&self) -> anyhow::Result<Vec<String>> {
        let response = self
            .http
            .get(self.endpoint("/api/v2/buckets"))
            .query(&[("org", self.config.org.as_str())])
            .header("Authorization", format!("Token {}", self.config.token))
            .send()
            .await
            .context("bucket listing request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("bucket listing returned {}: {}", status, body);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .context("bucket listing returned invalid json")?;
        let buckets: Vec<String> = body["buckets"]
            .as_array()
            .map(|buckets| {
                buckets
                    .iter()
                    .filter_map(|bucket| bucket["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        debug!(count = buckets.len(), "listed influxdb buckets");
        Ok(buckets)
    }

    /// Runs a Flux script and returns the annotated CSV body.
    pub async fn query_csv(&self, flux: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .post(self.endpoint("/api/v2/query"))
            .query(&[("org", self.config.org.as_str())])
            .header("Authorization", format!("Token {}", self.config.token))
            .header("Content-Type", "application/vnd.flux")
            .header("Accept", "application/csv")
            .body(flux.to_string())
            .send()
            .await
            .context("flux query request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("flux query returned {}: {}", status, body);
        }

        response.text().await.context("failed to read flux query response")
    }
}
