//! Supervises a fake sensor station with the skywatch runner.
//!
//! This example demonstrates:
//! - Running multiple named concurrent processes
//! - Graceful shutdown on SIGTERM/SIGINT (Ctrl+C)
//! - Cleanup with closers
//!
//! Run with: cargo run --example basic_runner

use skywatch_runner::{telemetry, Runner};
use std::time::Duration;

#[tokio::main]
async fn main() {
    telemetry::init_tracing("info");

    let runner = Runner::new()
        // A stand-in station that reports a drifting temperature every second
        .with_named_process("sensor-station", |ctx| async move {
            let mut temperature = 21.0_f64;
            loop {
                tokio::select! {
                    _ = ctx.cancelled() => {
                        tracing::info!("sensor station stopping at {:.2} C", temperature);
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_secs(1)) => {
                        temperature += 0.2;
                        tracing::info!("station/bmp/temperature = {:.2}", temperature);
                    }
                }
            }
            Ok(())
        })
        // Simulates the broker link dropping after 30 seconds (if not cancelled first)
        .with_named_process("broker-watchdog", |ctx| async move {
            tokio::select! {
                _ = ctx.cancelled() => {
                    tracing::info!("broker watchdog stopping");
                    Ok(())
                }
                _ = tokio::time::sleep(Duration::from_secs(30)) => {
                    Err(anyhow::anyhow!("lost connection to mqtt broker"))
                }
            }
        })
        .with_closer(|| async move {
            tracing::info!("disconnecting mqtt client");
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .with_closer(|| async move {
            tracing::info!("flushing buffered readings");
            Ok(())
        })
        .with_closer_timeout(Duration::from_secs(5));

    tracing::info!("press Ctrl+C for graceful shutdown");
    runner.run().await;
}
