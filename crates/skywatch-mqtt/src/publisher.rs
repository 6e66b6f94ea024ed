//! MQTT publisher adapter over rumqttc.

use anyhow::Context;
use async_trait::async_trait;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use skywatch_domain::{DomainError, DomainResult, ReadingPublisher};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

const CHANNEL_CAPACITY: usize = 64;
const KEEP_ALIVE: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct MqttPublisherConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
}

/// Fire-and-forget publisher for sensor readings. Payloads carry the value
/// formatted with exactly two decimal places.
#[derive(Clone)]
pub struct MqttReadingPublisher {
    client: AsyncClient,
}

impl MqttReadingPublisher {
    /// Creates the client and the event-loop driver. The connection is not
    /// established until the driver runs, so the driver must be handed to
    /// the runner alongside the publishing process.
    pub fn connect(config: &MqttPublisherConfig) -> (Self, MqttEventLoopDriver) {
        let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, event_loop) = AsyncClient::new(options, CHANNEL_CAPACITY);
        info!(
            host = %config.host,
            port = config.port,
            client_id = %config.client_id,
            "mqtt publisher created"
        );

        (Self { client }, MqttEventLoopDriver { event_loop })
    }

    /// Sends the MQTT disconnect packet, letting the driver wind down.
    /// Called by the runner closer after the publish loop has stopped.
    pub async fn disconnect(&self) -> anyhow::Result<()> {
        self.client
            .disconnect()
            .await
            .context("failed to send mqtt disconnect")
    }
}

#[async_trait]
impl ReadingPublisher for MqttReadingPublisher {
    async fn publish_reading(&self, topic: &str, value: f64) -> DomainResult<()> {
        let payload = format_reading(value);
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
            .map_err(|e| DomainError::PublishError {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Drives the rumqttc event loop: connection handling, keep-alives, and the
/// outgoing packet flow all happen inside `poll`. Runs until cancelled.
pub struct MqttEventLoopDriver {
    event_loop: EventLoop,
}

impl MqttEventLoopDriver {
    pub async fn run(mut self, ctx: CancellationToken) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!("mqtt event loop stopping");
                    break;
                }
                event = self.event_loop.poll() => {
                    match event {
                        Ok(event) => trace!(?event, "mqtt event"),
                        Err(e) => {
                            if ctx.is_cancelled() {
                                debug!(error = %e, "mqtt connection closed during shutdown");
                                break;
                            }
                            warn!(error = %e, "mqtt connection error, retrying");
                            tokio::select! {
                                _ = ctx.cancelled() => break,
                                _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Two decimal places, matching the payload format the station firmware
/// publishes.
pub fn format_reading(value: f64) -> String {
    format!("{:.2}", value)
}
