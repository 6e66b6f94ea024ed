mod config;

use anyhow::bail;
use skywatch_domain::ReportService;
use skywatch_groq::{GroqConfig, GroqNarrativeGenerator};
use skywatch_influx::{InfluxClient, InfluxConfig, InfluxReadingStore};
use skywatch_runner::{telemetry, Runner};
use skywatch_telegram::{CommandListener, TelegramClient, TelegramConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match config::ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(&config.log_level);
    info!("Starting skywatch bot");

    let listener = match initialize(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("startup failed: {:#}", e);
            std::process::exit(1);
        }
    };

    Runner::new()
        .with_named_process("command-listener", move |ctx| listener.run(ctx))
        .with_closer_timeout(Duration::from_secs(5))
        .run()
        .await;
}

/// Wires the adapters together. Fails fast when the reading store is
/// unreachable so a misconfigured bot never answers commands with
/// permanent error messages.
async fn initialize(config: &config::ServiceConfig) -> anyhow::Result<CommandListener> {
    let http_timeout = Duration::from_secs(config.http_timeout_secs);

    let influx = InfluxClient::new(InfluxConfig {
        url: config.influx_url.clone(),
        token: config.influx_token.clone(),
        org: config.influx_org.clone(),
        bucket: config.influx_bucket.clone(),
        measurement: config.influx_measurement.clone(),
        timeout: http_timeout,
    })?;

    match influx.list_buckets().await {
        Ok(buckets) => {
            info!(
                url = %influx.url(),
                org = %influx.org(),
                buckets = ?buckets,
                "connected to influxdb"
            );
        }
        Err(e) => {
            error!(
                url = %influx.url(),
                org = %influx.org(),
                "influxdb health check failed: {:#}",
                e
            );
            bail!("reading store unreachable");
        }
    }

    let narrator = GroqNarrativeGenerator::new(GroqConfig {
        api_url: config.groq_api_url.clone(),
        api_key: config.groq_api_key.clone(),
        model: config.groq_model.clone(),
        timeout: http_timeout,
    })?;
    if !narrator.has_credentials() {
        warn!("SKYWATCH_GROQ_API_KEY is empty, reports will carry the fallback summary");
    }

    let service = ReportService::new(
        Arc::new(InfluxReadingStore::new(influx)),
        Arc::new(narrator),
        config.site_label.clone(),
        chrono::Duration::minutes(config.lookback_minutes),
    );

    let telegram = TelegramClient::new(&TelegramConfig {
        api_url: config.telegram_api_url.clone(),
        token: config.telegram_token.clone(),
        poll_timeout: Duration::from_secs(config.poll_timeout_secs),
        http_timeout,
    })?;

    Ok(CommandListener::new(telegram, Arc::new(service)))
}
