//! Station state and the per-tick drift model.

use crate::profile::{ConditionProfile, PPM_MAX, PRESSURE_RANGE, SEA_LEVEL_PRESSURE};
use rand::Rng;
use skywatch_domain::channel::{
    TOPIC_AUTO_TEMPERATURE, TOPIC_BMP_ALTITUDE, TOPIC_BMP_PRESSURE, TOPIC_BMP_TEMPERATURE,
    TOPIC_DHT_HUMIDITY, TOPIC_DHT_TEMPERATURE, TOPIC_MQ135_PPM, TOPIC_UV_VOLTAGE,
};

/// Simulated readings for one station. Two independent temperature probes
/// (barometer and hygrometer), pressure with derived altitude, humidity
/// coupled to the hygrometer temperature, UV voltage, and a gas sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct StationState {
    pub bmp_temperature: f64,
    pub pressure: f64,
    pub altitude: f64,
    pub dht_temperature: f64,
    pub humidity: f64,
    pub uv_voltage: f64,
    pub pollutant_ppm: f64,
    previous_dht_temperature: f64,
    profile: ConditionProfile,
}

impl StationState {
    /// Draws the initial state for a condition profile. Pressure starts at
    /// the sea-level reference, everything else uniform in its range.
    pub fn init<R: Rng>(profile: ConditionProfile, rng: &mut R) -> Self {
        let (t_min, t_max) = profile.temperature;
        let (h_min, h_max) = profile.humidity;
        let (uv_min, uv_max) = profile.uv_voltage;

        let dht_temperature = rng.gen_range(t_min..=t_max);
        Self {
            bmp_temperature: rng.gen_range(t_min..=t_max),
            pressure: SEA_LEVEL_PRESSURE,
            altitude: 0.0,
            dht_temperature,
            humidity: rng.gen_range(h_min..=h_max),
            uv_voltage: rng.gen_range(uv_min..=uv_max),
            pollutant_ppm: rng.gen_range(0..=PPM_MAX) as f64,
            previous_dht_temperature: dht_temperature,
            profile,
        }
    }

    /// Advances the station by one tick.
    ///
    /// Each sensor drifts by a bounded uniform step and is clamped back
    /// into its profile range. Humidity follows the hygrometer temperature:
    /// a tenth of the temperature delta plus noise, limited to one point of
    /// movement per tick. The gas sensor is redrawn from scratch every
    /// tick. The pollutant aside, a value can only leave its range through
    /// a profile change, never through drift.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        let (t_min, t_max) = self.profile.temperature;
        let (h_min, h_max) = self.profile.humidity;
        let (uv_min, uv_max) = self.profile.uv_voltage;

        self.bmp_temperature =
            (self.bmp_temperature + rng.gen_range(-0.2..=0.2)).clamp(t_min, t_max);

        self.pressure =
            (self.pressure + rng.gen_range(-1.0..=1.0)).clamp(PRESSURE_RANGE.0, PRESSURE_RANGE.1);
        self.altitude = altitude_from_pressure(self.pressure);

        self.dht_temperature =
            (self.dht_temperature + rng.gen_range(-0.5..=0.5)).clamp(t_min, t_max);

        let temp_delta = self.dht_temperature - self.previous_dht_temperature;
        let humidity_change = 0.1 * temp_delta + rng.gen_range(-1.0..=1.0);
        self.humidity = (self.humidity + humidity_change.clamp(-1.0, 1.0)).clamp(h_min, h_max);

        self.pollutant_ppm = rng.gen_range(0..=PPM_MAX) as f64;

        self.uv_voltage = (self.uv_voltage + rng.gen_range(-5.0..=5.0)).clamp(uv_min, uv_max);

        self.previous_dht_temperature = self.dht_temperature;
    }

    /// Readings emitted after a tick, in publish order. The barometer
    /// temperature goes out twice, once on its own topic and once on the
    /// sensor-agnostic alias.
    pub fn emissions(&self) -> [(&'static str, f64); 8] {
        [
            (TOPIC_UV_VOLTAGE, self.uv_voltage),
            (TOPIC_BMP_TEMPERATURE, self.bmp_temperature),
            (TOPIC_AUTO_TEMPERATURE, self.bmp_temperature),
            (TOPIC_BMP_PRESSURE, self.pressure),
            (TOPIC_BMP_ALTITUDE, self.altitude),
            (TOPIC_DHT_TEMPERATURE, self.dht_temperature),
            (TOPIC_DHT_HUMIDITY, self.humidity),
            (TOPIC_MQ135_PPM, self.pollutant_ppm),
        ]
    }
}

/// Barometric altitude in meters above the sea-level reference pressure.
/// Zero at the reference, negative above it.
pub fn altitude_from_pressure(pressure_hpa: f64) -> f64 {
    44330.0 * (1.0 - (pressure_hpa / SEA_LEVEL_PRESSURE).powf(1.0 / 5.255))
}
