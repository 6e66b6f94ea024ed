mod publisher;

pub use publisher::{MqttEventLoopDriver, MqttPublisherConfig, MqttReadingPublisher};
