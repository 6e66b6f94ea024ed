use crate::error::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A single raw measurement as it sits in the telemetry pipeline: the MQTT
/// topic it was published on, the numeric payload, and when it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub topic: String,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
}

impl RawReading {
    pub fn new(topic: impl Into<String>, value: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            topic: topic.into(),
            value,
            recorded_at,
        }
    }
}

/// Trait for querying raw readings from the time-series store
///
/// Implementations should:
/// - Return the readings recorded inside the window, one or more per topic
/// - Leave channel selection and last-wins reduction to the aggregator
/// - Map transport failures into DomainError
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Fetch raw readings recorded inside `[start, stop]`.
    async fn readings_between(
        &self,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> DomainResult<Vec<RawReading>>;
}

/// Trait for publishing sensor readings to the message broker
///
/// Implementations should:
/// - Format the payload with exactly two decimal places
/// - Publish fire-and-forget, without waiting for delivery confirmation
/// - Return error if the publish cannot be enqueued
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReadingPublisher: Send + Sync {
    /// Publish a single reading on the given topic.
    async fn publish_reading(&self, topic: &str, value: f64) -> DomainResult<()>;
}
