//! `ReadingStore` over the InfluxDB 2.x query API.

use crate::client::InfluxClient;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use skywatch_domain::{DomainResult, RawReading, ReadingStore, SNAPSHOT_TOPICS};
use tracing::{instrument, warn};

pub struct InfluxReadingStore {
    client: InfluxClient,
}

impl InfluxReadingStore {
    pub fn new(client: InfluxClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReadingStore for InfluxReadingStore {
    #[instrument(skip(self))]
    async fn readings_between(
        &self,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> DomainResult<Vec<RawReading>> {
        let flux = latest_readings_flux(
            self.client.bucket(),
            self.client.measurement(),
            start,
            stop,
        );
        let csv = self.client.query_csv(&flux).await?;
        Ok(parse_annotated_csv(&csv))
    }
}

/// Flux script fetching the last reading per report topic inside the
/// window. The aggregator re-applies last-wins, so extra rows are harmless.
fn latest_readings_flux(
    bucket: &str,
    measurement: &str,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
) -> String {
    let topic_filter = SNAPSHOT_TOPICS
        .iter()
        .map(|topic| format!("r[\"topic\"] == \"{}\"", topic))
        .collect::<Vec<_>>()
        .join(" or ");

    format!(
        "from(bucket: \"{bucket}\")\n  \
         |> range(start: {start}, stop: {stop})\n  \
         |> filter(fn: (r) => r[\"_measurement\"] == \"{measurement}\")\n  \
         |> filter(fn: (r) => {topic_filter})\n  \
         |> last()",
        bucket = bucket,
        start = start.to_rfc3339_opts(SecondsFormat::Secs, true),
        stop = stop.to_rfc3339_opts(SecondsFormat::Secs, true),
        measurement = measurement,
        topic_filter = topic_filter,
    )
}

/// Decodes InfluxDB annotated CSV into raw readings.
///
/// Annotation rows start with `#`, a blank line separates result tables,
/// and the first plain row after a boundary is that table's header. Only
/// the `_time`, `_value`, and `topic` columns matter; rows that fail to
/// parse are logged and dropped. Naive comma splitting is fine here since
/// none of the selected columns contain commas.
fn parse_annotated_csv(body: &str) -> Vec<RawReading> {
    let mut readings = Vec::new();
    let mut columns: Option<Columns> = None;

    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            columns = None;
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        match &columns {
            None => columns = Some(Columns::from_header(&fields)),
            Some(cols) => match cols.parse_row(&fields) {
                Some(reading) => readings.push(reading),
                None => warn!(row = line, "skipping unparseable csv row"),
            },
        }
    }

    readings
}

struct Columns {
    time: Option<usize>,
    value: Option<usize>,
    topic: Option<usize>,
}

impl Columns {
    fn from_header(fields: &[&str]) -> Self {
        let position = |name: &str| fields.iter().position(|field| *field == name);
        Self {
            time: position("_time"),
            value: position("_value"),
            topic: position("topic"),
        }
    }

    fn parse_row(&self, fields: &[&str]) -> Option<RawReading> {
        let time = *fields.get(self.time?)?;
        let value = *fields.get(self.value?)?;
        let topic = *fields.get(self.topic?)?;

        let recorded_at = DateTime::parse_from_rfc3339(time).ok()?.with_timezone(&Utc);
        let value = value.parse::<f64>().ok()?;
        Some(RawReading::new(topic, value, recorded_at))
    }
}
