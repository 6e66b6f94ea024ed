//! Topics published by the sensor station and the channel classification
//! used when aggregating stored readings.

/// UV photodiode output in millivolts.
pub const TOPIC_UV_VOLTAGE: &str = "sensor/uv/voltage";
/// Barometer temperature probe in degrees Celsius.
pub const TOPIC_BMP_TEMPERATURE: &str = "sensor/bmp/temperature";
/// Alias of the barometer temperature, kept for downstream consumers that
/// subscribe to the sensor-agnostic topic.
pub const TOPIC_AUTO_TEMPERATURE: &str = "sensor/auto/temperature";
/// Barometric pressure in hectopascals.
pub const TOPIC_BMP_PRESSURE: &str = "sensor/bmp/pressure";
/// Altitude derived from pressure, in meters.
pub const TOPIC_BMP_ALTITUDE: &str = "sensor/bmp/altitude";
/// Hygrometer temperature probe in degrees Celsius.
pub const TOPIC_DHT_TEMPERATURE: &str = "sensor/dht/temperature";
/// Relative humidity in percent.
pub const TOPIC_DHT_HUMIDITY: &str = "sensor/dht/humidity";
/// Gas sensor pollutant concentration in ppm.
pub const TOPIC_MQ135_PPM: &str = "sensor/mq135/ppm";

/// Topics the report query asks the time-series store for, one per
/// aggregated channel.
pub const SNAPSHOT_TOPICS: [&str; 5] = [
    TOPIC_AUTO_TEMPERATURE,
    TOPIC_BMP_PRESSURE,
    TOPIC_DHT_HUMIDITY,
    TOPIC_MQ135_PPM,
    TOPIC_UV_VOLTAGE,
];

/// Measurement channels recognized by the snapshot aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorChannel {
    /// Degrees Celsius
    Temperature,
    /// Hectopascals
    Pressure,
    /// Percent relative humidity
    Humidity,
    /// Millivolts from the UV photodiode
    UvVoltage,
    /// Parts per million from the gas sensor
    PollutantPpm,
}

impl SensorChannel {
    /// Classify a topic into a recognized channel by substring match.
    /// Topics outside the five patterns (altitude, unrelated feeds) return
    /// `None` and are ignored by the aggregator.
    ///
    /// # Example
    /// ```
    /// use skywatch_domain::channel::SensorChannel;
    ///
    /// let channel = SensorChannel::from_topic("sensor/dht/humidity");
    /// assert_eq!(channel, Some(SensorChannel::Humidity));
    /// assert_eq!(SensorChannel::from_topic("sensor/bmp/altitude"), None);
    /// ```
    pub fn from_topic(topic: &str) -> Option<Self> {
        if topic.contains("temperature") {
            Some(Self::Temperature)
        } else if topic.contains("pressure") {
            Some(Self::Pressure)
        } else if topic.contains("humidity") {
            Some(Self::Humidity)
        } else if topic.contains("uv/voltage") {
            Some(Self::UvVoltage)
        } else if topic.contains("mq135/ppm") {
            Some(Self::PollutantPpm)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_published_topics() {
        assert_eq!(
            SensorChannel::from_topic(TOPIC_BMP_TEMPERATURE),
            Some(SensorChannel::Temperature)
        );
        assert_eq!(
            SensorChannel::from_topic(TOPIC_AUTO_TEMPERATURE),
            Some(SensorChannel::Temperature)
        );
        assert_eq!(
            SensorChannel::from_topic(TOPIC_DHT_TEMPERATURE),
            Some(SensorChannel::Temperature)
        );
        assert_eq!(
            SensorChannel::from_topic(TOPIC_BMP_PRESSURE),
            Some(SensorChannel::Pressure)
        );
        assert_eq!(
            SensorChannel::from_topic(TOPIC_DHT_HUMIDITY),
            Some(SensorChannel::Humidity)
        );
        assert_eq!(
            SensorChannel::from_topic(TOPIC_UV_VOLTAGE),
            Some(SensorChannel::UvVoltage)
        );
        assert_eq!(
            SensorChannel::from_topic(TOPIC_MQ135_PPM),
            Some(SensorChannel::PollutantPpm)
        );
    }

    #[test]
    fn test_altitude_is_not_a_snapshot_channel() {
        assert_eq!(SensorChannel::from_topic(TOPIC_BMP_ALTITUDE), None);
    }

    #[test]
    fn test_unrelated_topics_are_ignored() {
        assert_eq!(SensorChannel::from_topic("sensor/unknown"), None);
        assert_eq!(SensorChannel::from_topic(""), None);
        assert_eq!(SensorChannel::from_topic("home/lights/kitchen"), None);
    }

    #[test]
    fn test_snapshot_topics_cover_all_channels() {
        let channels: Vec<_> = SNAPSHOT_TOPICS
            .iter()
            .filter_map(|topic| SensorChannel::from_topic(topic))
            .collect();
        assert_eq!(channels.len(), SNAPSHOT_TOPICS.len());
        assert!(channels.contains(&SensorChannel::Temperature));
        assert!(channels.contains(&SensorChannel::Pressure));
        assert!(channels.contains(&SensorChannel::Humidity));
        assert!(channels.contains(&SensorChannel::UvVoltage));
        assert!(channels.contains(&SensorChannel::PollutantPpm));
    }
}
