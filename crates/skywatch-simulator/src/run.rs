//! The publish loop: tick the station model, emit every reading.

use crate::profile::ConditionProfile;
use crate::state::StationState;
use rand::Rng;
use skywatch_domain::ReadingPublisher;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs the synthetic station until cancelled.
///
/// Every tick advances the drift model and publishes the eight readings.
/// Publishes are fire-and-forget: a failure is logged and the loop moves
/// on, so a flapping broker costs readings, not the process.
pub async fn run_simulator<R: Rng + Send>(
    ctx: CancellationToken,
    publisher: Arc<dyn ReadingPublisher>,
    profile: ConditionProfile,
    tick_interval: Duration,
    mut rng: R,
) -> anyhow::Result<()> {
    let mut state = StationState::init(profile, &mut rng);
    info!(
        profile = %profile,
        tick_secs = tick_interval.as_secs_f64(),
        "starting synthetic sensor station"
    );

    loop {
        tokio::select! {
            _ = ctx.cancelled() => {
                info!("synthetic sensor station stopping");
                break;
            }
            _ = tokio::time::sleep(tick_interval) => {
                state.tick(&mut rng);
                publish_tick(&state, publisher.as_ref()).await;
            }
        }
    }

    Ok(())
}

async fn publish_tick(state: &StationState, publisher: &dyn ReadingPublisher) {
    for (topic, value) in state.emissions() {
        match publisher.publish_reading(topic, value).await {
            Ok(()) => debug!(topic, value, "published reading"),
            Err(e) => warn!(topic, error = %e, "failed to publish reading"),
        }
    }

    info!(
        temperature = state.bmp_temperature,
        pressure = state.pressure,
        humidity = state.humidity,
        uv_voltage = state.uv_voltage,
        pollutant_ppm = state.pollutant_ppm,
        "tick published"
    );
}
