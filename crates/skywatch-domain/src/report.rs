//! Rendering of the report text sent back to the chat.

use crate::snapshot::Snapshot;
use chrono::Local;

/// Placeholder for channels with no reading inside the window.
pub const MISSING_VALUE: &str = "---";

/// Fixed reply used when the store query itself fails. Never rendered as a
/// partial report; the caller short-circuits before aggregation.
pub const STORE_FAILURE_MESSAGE: &str =
    "⚠️ Sorry, sensor data cannot be retrieved right now. Please try again later.";

/// Fallback sentence when the narrative backend is unavailable.
pub const NARRATIVE_FALLBACK: &str = "AI conclusion unavailable";

/// Immediate acknowledgement sent before the report is assembled.
pub const FETCHING_ACK: &str = "Fetching sensor information...";

/// One decimal place, or the placeholder.
pub fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.1}", value),
        None => MISSING_VALUE.to_string(),
    }
}

/// Render the fixed-layout report. Absent channels show the placeholder;
/// the narrative slot always receives either the generated sentence or the
/// static fallback.
pub fn render_report(snapshot: &Snapshot, narrative: &str, site_label: &str) -> String {
    let local = snapshot.taken_at.with_timezone(&Local);
    let date = local.format("%d/%m/%Y");
    let time = local.format("%H:%M");

    let temperature = format_optional(snapshot.temperature);
    let pressure = format_optional(snapshot.pressure);
    let humidity = format_optional(snapshot.humidity);

    let (uv_index, uv_category) = match &snapshot.uv {
        Some(uv) => (uv.index.to_string(), uv.category.to_string()),
        None => (MISSING_VALUE.to_string(), MISSING_VALUE.to_string()),
    };
    let (ppm, ppm_category) = match &snapshot.pollutant {
        Some(pollutant) => (format!("{:.1}", pollutant.ppm), pollutant.category.to_string()),
        None => (MISSING_VALUE.to_string(), MISSING_VALUE.to_string()),
    };

    format!(
        "📊 Air Quality Report\n\
         📅 {date} | ⏰ {time} | 📍 {site_label}\n\
         \n\
         🌡 Temperature: {temperature} °C\n\
         ☀️ UV Index: {uv_index} ({uv_category})\n\
         💧 Humidity: {humidity} %\n\
         🔽 Pressure: {pressure} hPa\n\
         🏭 CO level: {ppm} ppm ({ppm_category})\n\
         \n\
         📝 Summary: {narrative}"
    )
}
