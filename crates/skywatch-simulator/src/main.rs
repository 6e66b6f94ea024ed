use rand::rngs::StdRng;
use rand::SeedableRng;
use skywatch_mqtt::{MqttPublisherConfig, MqttReadingPublisher};
use skywatch_runner::{telemetry, Runner};
use skywatch_simulator::config::SimulatorConfig;
use skywatch_simulator::profile::ConditionProfile;
use skywatch_simulator::run::run_simulator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match SimulatorConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(&config.log_level);
    info!("Starting skywatch simulator");
    info!("Configuration: {:?}", config);

    let profile: ConditionProfile = match config.condition.parse() {
        Ok(profile) => profile,
        Err(e) => {
            error!(error = %e, "invalid SKYWATCH_CONDITION value");
            std::process::exit(1);
        }
    };

    let mqtt_config = MqttPublisherConfig {
        host: config.mqtt_host.clone(),
        port: config.mqtt_port,
        client_id: config.mqtt_client_id.clone(),
    };
    let (publisher, driver) = MqttReadingPublisher::connect(&mqtt_config);
    let publisher = Arc::new(publisher);

    let tick_interval = Duration::from_secs(config.tick_secs);
    let station_publisher = publisher.clone();

    Runner::new()
        .with_named_process("mqtt-event-loop", move |ctx| driver.run(ctx))
        .with_named_process("sensor-station", move |ctx| {
            run_simulator(
                ctx,
                station_publisher,
                profile,
                tick_interval,
                StdRng::from_entropy(),
            )
        })
        .with_closer(move || async move { publisher.disconnect().await })
        .with_closer_timeout(Duration::from_secs(5))
        .run()
        .await;
}
