//! End-to-end pipeline check without live infrastructure: run the station
//! against an in-memory publisher, feed the captured payloads through the
//! aggregator, and render a report from them.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use skywatch_domain::{
    build_snapshot, render_report, DomainResult, RawReading, ReadingPublisher, UvCategory,
};
use skywatch_simulator::profile::MODERATE;
use skywatch_simulator::run_simulator;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Captures published readings the way a broker-plus-consumer pipeline
/// would hand them to the store, payload included.
struct CapturingPublisher {
    published: Mutex<Vec<(String, String)>>,
}

impl CapturingPublisher {
    fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
        }
    }

    fn captured(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadingPublisher for CapturingPublisher {
    async fn publish_reading(&self, topic: &str, value: f64) -> DomainResult<()> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), format!("{:.2}", value)));
        Ok(())
    }
}

#[tokio::test]
async fn test_station_output_flows_into_a_renderable_report() {
    let publisher = Arc::new(CapturingPublisher::new());
    let ctx = CancellationToken::new();

    let station = tokio::spawn(run_simulator(
        ctx.clone(),
        publisher.clone() as Arc<dyn ReadingPublisher>,
        MODERATE,
        Duration::from_millis(10),
        StdRng::seed_from_u64(2024),
    ));

    // Wait for at least three full ticks of eight readings each.
    loop {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if publisher.captured().len() >= 24 {
            break;
        }
    }
    ctx.cancel();
    station.await.unwrap().unwrap();

    // Read after the join so no tick is caught halfway through.
    let captured = publisher.captured();
    assert_eq!(captured.len() % 8, 0, "ticks publish all eight readings");

    // Every payload is a two-decimal number.
    for (topic, payload) in &captured {
        let value: f64 = payload.parse().unwrap_or_else(|_| {
            panic!("payload on {} is not numeric: {}", topic, payload)
        });
        assert!(value.is_finite());
        let decimals = payload.split('.').nth(1).unwrap_or("");
        assert_eq!(decimals.len(), 2, "payload on {} is not two-decimal: {}", topic, payload);
    }

    // Replay the captured readings as the store would return them.
    let now = Utc::now();
    let readings: Vec<RawReading> = captured
        .iter()
        .map(|(topic, payload)| RawReading::new(topic.clone(), payload.parse().unwrap(), now))
        .collect();

    let snapshot = build_snapshot(&readings, now, ChronoDuration::minutes(10));

    // The moderate profile pins every channel inside known bounds.
    let temperature = snapshot.temperature.expect("temperature present");
    assert!((20.0..=30.0).contains(&temperature));
    let humidity = snapshot.humidity.expect("humidity present");
    assert!((50.0..=70.0).contains(&humidity));
    let pressure = snapshot.pressure.expect("pressure present");
    assert!((950.0..=1050.0).contains(&pressure));
    let uv = snapshot.uv.expect("uv present");
    assert!(uv.index >= 5, "moderate uv voltage maps to index 5 or higher");
    assert_ne!(uv.category, UvCategory::None);
    let pollutant = snapshot.pollutant.expect("pollutant present");
    assert!((0.0..=400.0).contains(&pollutant.ppm));

    let report = render_report(&snapshot, "Calm air today.", "Test bench");
    assert!(report.contains("📍 Test bench"));
    assert!(report.contains("📝 Summary: Calm air today."));
    assert!(!report.contains("---"));
}
