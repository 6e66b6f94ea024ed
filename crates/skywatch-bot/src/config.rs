use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    // InfluxDB configuration
    /// InfluxDB base URL
    #[serde(default = "default_influx_url")]
    pub influx_url: String,

    /// InfluxDB API token
    #[serde(default)]
    pub influx_token: String,

    /// InfluxDB organization
    #[serde(default)]
    pub influx_org: String,

    /// Bucket the MQTT consumer writes into
    #[serde(default = "default_influx_bucket")]
    pub influx_bucket: String,

    /// Measurement name used by the MQTT consumer
    #[serde(default = "default_influx_measurement")]
    pub influx_measurement: String,

    // Telegram configuration
    /// Bot token, required
    pub telegram_token: String,

    /// Bot API host
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Long-poll hold time in seconds
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    // Narrative backend configuration
    /// API key; leave empty to run without AI summaries
    #[serde(default)]
    pub groq_api_key: String,

    /// Chat model to request
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_groq_api_url")]
    pub groq_api_url: String,

    // Report configuration
    /// Location line shown in the report header
    #[serde(default = "default_site_label")]
    pub site_label: String,

    /// How far back to look for readings, in minutes
    #[serde(default = "default_lookback_minutes")]
    pub lookback_minutes: i64,

    /// Timeout for outbound HTTP calls in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_influx_url() -> String {
    "http://localhost:8086".to_string()
}

fn default_influx_bucket() -> String {
    "sensors".to_string()
}

fn default_influx_measurement() -> String {
    "mqtt_consumer".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_groq_model() -> String {
    "gemma2-9b-it".to_string()
}

fn default_groq_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_site_label() -> String {
    "Unknown location".to_string()
}

fn default_lookback_minutes() -> i64 {
    10
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("SKYWATCH"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure tests run serially and don't interfere with each other
    static TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::remove_var("SKYWATCH_INFLUX_URL");
        std::env::remove_var("SKYWATCH_INFLUX_BUCKET");
        std::env::remove_var("SKYWATCH_SITE_LABEL");
        std::env::remove_var("SKYWATCH_LOOKBACK_MINUTES");
        std::env::set_var("SKYWATCH_TELEGRAM_TOKEN", "123456:test-token");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.influx_url, "http://localhost:8086");
        assert_eq!(config.influx_token, "");
        assert_eq!(config.influx_bucket, "sensors");
        assert_eq!(config.influx_measurement, "mqtt_consumer");
        assert_eq!(config.telegram_token, "123456:test-token");
        assert_eq!(config.telegram_api_url, "https://api.telegram.org");
        assert_eq!(config.poll_timeout_secs, 30);
        assert_eq!(config.groq_api_key, "");
        assert_eq!(config.groq_model, "gemma2-9b-it");
        assert_eq!(config.site_label, "Unknown location");
        assert_eq!(config.lookback_minutes, 10);
        assert_eq!(config.http_timeout_secs, 10);
        assert_eq!(config.log_level, "info");

        std::env::remove_var("SKYWATCH_TELEGRAM_TOKEN");
    }

    #[test]
    fn test_custom_config() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::set_var("SKYWATCH_TELEGRAM_TOKEN", "123456:test-token");
        std::env::set_var("SKYWATCH_INFLUX_URL", "http://influx.local:8086");
        std::env::set_var("SKYWATCH_INFLUX_BUCKET", "readings");
        std::env::set_var("SKYWATCH_SITE_LABEL", "Hanoi, Vietnam");
        std::env::set_var("SKYWATCH_LOOKBACK_MINUTES", "30");

        let config = ServiceConfig::from_env().unwrap();
        assert_eq!(config.influx_url, "http://influx.local:8086");
        assert_eq!(config.influx_bucket, "readings");
        assert_eq!(config.site_label, "Hanoi, Vietnam");
        assert_eq!(config.lookback_minutes, 30);

        // Clean up
        std::env::remove_var("SKYWATCH_TELEGRAM_TOKEN");
        std::env::remove_var("SKYWATCH_INFLUX_URL");
        std::env::remove_var("SKYWATCH_INFLUX_BUCKET");
        std::env::remove_var("SKYWATCH_SITE_LABEL");
        std::env::remove_var("SKYWATCH_LOOKBACK_MINUTES");
    }

    #[test]
    fn test_missing_telegram_token_is_an_error() {
        let _lock = TEST_LOCK.lock().unwrap();

        std::env::remove_var("SKYWATCH_TELEGRAM_TOKEN");

        assert!(ServiceConfig::from_env().is_err());
    }
}
