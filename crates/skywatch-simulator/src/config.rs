use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimulatorConfig {
    /// MQTT broker host
    #[serde(default = "default_mqtt_host")]
    pub mqtt_host: String,

    /// MQTT broker port
    #[serde(default = "default_mqtt_port")]
    pub mqtt_port: u16,

    /// MQTT client identifier
    #[serde(default = "default_mqtt_client_id")]
    pub mqtt_client_id: String,

    /// Climate condition to simulate (cold, cool, moderate, hot)
    #[serde(default = "default_condition")]
    pub condition: String,

    /// Seconds between ticks
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_mqtt_host() -> String {
    "localhost".to_string()
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_mqtt_client_id() -> String {
    "skywatch-simulator".to_string()
}

fn default_condition() -> String {
    "moderate".to_string()
}

fn default_tick_secs() -> u64 {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SimulatorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("SKYWATCH"))
            .build()?
            .try_deserialize()
    }
}
