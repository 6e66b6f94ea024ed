//! Latest-value aggregation over a query window.

use crate::channel::SensorChannel;
use crate::reading::RawReading;
use crate::units::{uv_index_from_voltage, AirQualityCategory, UvCategory};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// UV reading converted from the raw photodiode voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvReading {
    pub index: u8,
    pub category: UvCategory,
}

/// Pollutant reading with its air-quality bucket. The category is computed
/// from the already-rounded value so the report and the category agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantReading {
    pub ppm: f64,
    pub category: AirQualityCategory,
}

/// The latest reading per recognized channel inside one query window.
///
/// Constructed fresh per report request and never mutated afterwards. An
/// absent field means no reading of that channel survived the window
/// filter; renderers substitute a placeholder. An all-absent snapshot is a
/// normal value, distinct from a store failure (which never reaches the
/// aggregator).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// End of the query window, also the report timestamp.
    pub taken_at: DateTime<Utc>,
    /// Degrees Celsius, one decimal place.
    pub temperature: Option<f64>,
    /// Hectopascals, one decimal place.
    pub pressure: Option<f64>,
    /// Percent relative humidity, one decimal place.
    pub humidity: Option<f64>,
    pub uv: Option<UvReading>,
    pub pollutant: Option<PollutantReading>,
}

impl Snapshot {
    /// True when no channel carried a reading inside the window.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.pressure.is_none()
            && self.humidity.is_none()
            && self.uv.is_none()
            && self.pollutant.is_none()
    }
}

/// Round to one decimal place for display.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Aggregate raw readings into a snapshot.
///
/// Readings outside `[window_end - window, window_end]` are dropped, the
/// rest are classified by topic, and the latest reading per channel wins.
/// On an exact timestamp tie the later element of the input list wins,
/// matching the overwrite order of the upstream pipeline.
pub fn build_snapshot(
    readings: &[RawReading],
    window_end: DateTime<Utc>,
    window: Duration,
) -> Snapshot {
    let window_start = window_end - window;

    let mut latest: HashMap<SensorChannel, &RawReading> = HashMap::new();
    for reading in readings {
        if reading.recorded_at < window_start || reading.recorded_at > window_end {
            continue;
        }
        let channel = match SensorChannel::from_topic(&reading.topic) {
            Some(channel) => channel,
            None => continue,
        };
        match latest.get(&channel) {
            Some(current) if current.recorded_at > reading.recorded_at => {}
            _ => {
                latest.insert(channel, reading);
            }
        }
    }

    let value_of = |channel: SensorChannel| latest.get(&channel).map(|reading| reading.value);

    let uv = value_of(SensorChannel::UvVoltage).map(|voltage| {
        let index = uv_index_from_voltage(round1(voltage));
        UvReading {
            index,
            category: UvCategory::from_index(index),
        }
    });

    let pollutant = value_of(SensorChannel::PollutantPpm).map(|value| {
        let ppm = round1(value);
        PollutantReading {
            ppm,
            category: AirQualityCategory::from_ppm(ppm),
        }
    });

    Snapshot {
        taken_at: window_end,
        temperature: value_of(SensorChannel::Temperature).map(round1),
        pressure: value_of(SensorChannel::Pressure).map(round1),
        humidity: value_of(SensorChannel::Humidity).map(round1),
        uv,
        pollutant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{
        TOPIC_AUTO_TEMPERATURE, TOPIC_BMP_ALTITUDE, TOPIC_BMP_PRESSURE, TOPIC_DHT_HUMIDITY,
        TOPIC_MQ135_PPM, TOPIC_UV_VOLTAGE,
    };
    use chrono::TimeZone;

    fn window_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn reading(topic: &str, value: f64, seconds_before_end: i64) -> RawReading {
        RawReading::new(topic, value, window_end() - Duration::seconds(seconds_before_end))
    }

    #[test]
    fn test_empty_input_builds_empty_snapshot() {
        let snapshot = build_snapshot(&[], window_end(), Duration::minutes(10));

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.taken_at, window_end());
        assert_eq!(snapshot.temperature, None);
        assert_eq!(snapshot.pressure, None);
        assert_eq!(snapshot.humidity, None);
        assert_eq!(snapshot.uv, None);
        assert_eq!(snapshot.pollutant, None);
    }

    #[test]
    fn test_values_are_rounded_to_one_decimal() {
        let readings = vec![
            reading(TOPIC_AUTO_TEMPERATURE, 21.37, 30),
            reading(TOPIC_BMP_PRESSURE, 1001.26, 30),
            reading(TOPIC_DHT_HUMIDITY, 55.44, 30),
        ];

        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        assert_eq!(snapshot.temperature, Some(21.4));
        assert_eq!(snapshot.pressure, Some(1001.3));
        assert_eq!(snapshot.humidity, Some(55.4));
    }

    #[test]
    fn test_latest_reading_per_channel_wins() {
        let readings = vec![
            reading(TOPIC_AUTO_TEMPERATURE, 20.0, 120),
            reading(TOPIC_AUTO_TEMPERATURE, 22.0, 10),
            reading(TOPIC_AUTO_TEMPERATURE, 21.0, 60),
        ];

        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        assert_eq!(snapshot.temperature, Some(22.0));
    }

    #[test]
    fn test_tied_timestamps_keep_the_later_element() {
        let readings = vec![
            reading(TOPIC_DHT_HUMIDITY, 40.0, 30),
            reading(TOPIC_DHT_HUMIDITY, 41.0, 30),
        ];

        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        assert_eq!(snapshot.humidity, Some(41.0));
    }

    #[test]
    fn test_readings_outside_the_window_are_excluded() {
        let readings = vec![
            // Eleven minutes old, one minute outside the window.
            reading(TOPIC_AUTO_TEMPERATURE, 19.0, 11 * 60),
            // One second past the window end.
            RawReading::new(TOPIC_DHT_HUMIDITY, 50.0, window_end() + Duration::seconds(1)),
            // Exactly on both bounds, kept.
            reading(TOPIC_BMP_PRESSURE, 1000.0, 10 * 60),
            RawReading::new(TOPIC_MQ135_PPM, 42.0, window_end()),
        ];

        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        assert_eq!(snapshot.temperature, None);
        assert_eq!(snapshot.humidity, None);
        assert_eq!(snapshot.pressure, Some(1000.0));
        assert_eq!(snapshot.pollutant.map(|p| p.ppm), Some(42.0));
    }

    #[test]
    fn test_unrecognized_topics_are_ignored() {
        let readings = vec![
            reading(TOPIC_BMP_ALTITUDE, 120.0, 30),
            reading("home/lights/kitchen", 1.0, 30),
        ];

        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_uv_voltage_converts_to_index_and_category() {
        let readings = vec![reading(TOPIC_UV_VOLTAGE, 650.0, 30)];

        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        let uv = snapshot.uv.unwrap();
        assert_eq!(uv.index, 6);
        assert_eq!(uv.category, UvCategory::High);
    }

    #[test]
    fn test_pollutant_category_uses_the_rounded_value() {
        let readings = vec![reading(TOPIC_MQ135_PPM, 50.44, 30)];

        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        let pollutant = snapshot.pollutant.unwrap();
        assert_eq!(pollutant.ppm, 50.4);
        assert_eq!(pollutant.category, AirQualityCategory::Good);
    }
}
