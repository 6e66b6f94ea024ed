//! Prompt construction for the narrative summary.

use skywatch_domain::{format_optional, Snapshot, MISSING_VALUE};

pub const SYSTEM_PROMPT: &str =
    "You are an expert assistant analyzing environmental conditions from sensor readings.";

/// User message embedding the snapshot. Absent channels carry the same
/// placeholder the report shows, so the model never invents values.
pub fn snapshot_prompt(snapshot: &Snapshot) -> String {
    let (uv_index, uv_category) = match &snapshot.uv {
        Some(uv) => (uv.index.to_string(), uv.category.to_string()),
        None => (MISSING_VALUE.to_string(), MISSING_VALUE.to_string()),
    };
    let (ppm, ppm_category) = match &snapshot.pollutant {
        Some(pollutant) => (format!("{:.1}", pollutant.ppm), pollutant.category.to_string()),
        None => (MISSING_VALUE.to_string(), MISSING_VALUE.to_string()),
    };

    format!(
        "Provide a short conclusion and recommendation based on the following sensor data:\n\
         - Temperature: {temperature} °C\n\
         - Humidity: {humidity} %\n\
         - Pressure: {pressure} hPa\n\
         - UV index: {uv_index} (category: {uv_category})\n\
         - CO level: {ppm} ppm (category: {ppm_category})\n\
         \n\
         Write one very short, clear sentence focusing on the current conditions and practical advice.",
        temperature = format_optional(snapshot.temperature),
        humidity = format_optional(snapshot.humidity),
        pressure = format_optional(snapshot.pressure),
        uv_index = uv_index,
        uv_category = uv_category,
        ppm = ppm,
        ppm_category = ppm_category,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use skywatch_domain::{build_snapshot, RawReading};

    fn window_end() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_prompt_carries_the_snapshot_values() {
        let readings = vec![
            RawReading::new("sensor/auto/temperature", 23.56, window_end()),
            RawReading::new("sensor/uv/voltage", 650.0, window_end()),
            RawReading::new("sensor/mq135/ppm", 42.0, window_end()),
        ];
        let snapshot = build_snapshot(&readings, window_end(), Duration::minutes(10));

        let prompt = snapshot_prompt(&snapshot);

        assert!(prompt.contains("Temperature: 23.6 °C"));
        assert!(prompt.contains("UV index: 6 (category: High)"));
        assert!(prompt.contains("CO level: 42.0 ppm (category: Good)"));
        assert!(prompt.contains("one very short, clear sentence"));
    }

    #[test]
    fn test_empty_snapshot_prompts_with_placeholders() {
        let snapshot = build_snapshot(&[], window_end(), Duration::minutes(10));

        let prompt = snapshot_prompt(&snapshot);

        assert!(prompt.contains("Temperature: --- °C"));
        assert!(prompt.contains("Humidity: --- %"));
        assert!(prompt.contains("UV index: --- (category: ---)"));
        assert!(prompt.contains("CO level: --- ppm (category: ---)"));
    }
}
