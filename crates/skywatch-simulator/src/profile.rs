//! Named climate conditions steering the synthetic station.

use skywatch_domain::DomainError;
use std::fmt;
use std::str::FromStr;

/// Pressure stays inside these bounds regardless of the profile.
pub const PRESSURE_RANGE: (f64, f64) = (950.0, 1050.0);

/// Standard sea-level pressure, also the initial value and the altitude
/// reference.
pub const SEA_LEVEL_PRESSURE: f64 = 1013.25;

/// Pollutant draws are uniform integers in `0..=PPM_MAX` for every profile.
pub const PPM_MAX: u32 = 400;

/// Value ranges for one simulated climate condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionProfile {
    pub name: &'static str,
    /// Degrees Celsius, bounds for both temperature probes.
    pub temperature: (f64, f64),
    /// Percent relative humidity.
    pub humidity: (f64, f64),
    /// Millivolts from the UV photodiode.
    pub uv_voltage: (f64, f64),
}

pub const COLD: ConditionProfile = ConditionProfile {
    name: "cold",
    temperature: (-10.0, 10.0),
    humidity: (20.0, 40.0),
    uv_voltage: (0.0, 300.0),
};

pub const COOL: ConditionProfile = ConditionProfile {
    name: "cool",
    temperature: (10.0, 20.0),
    humidity: (40.0, 60.0),
    uv_voltage: (300.0, 600.0),
};

pub const MODERATE: ConditionProfile = ConditionProfile {
    name: "moderate",
    temperature: (20.0, 30.0),
    humidity: (50.0, 70.0),
    uv_voltage: (600.0, 900.0),
};

pub const HOT: ConditionProfile = ConditionProfile {
    name: "hot",
    temperature: (30.0, 40.0),
    humidity: (60.0, 80.0),
    uv_voltage: (900.0, 1200.0),
};

pub const ALL_PROFILES: [ConditionProfile; 4] = [COLD, COOL, MODERATE, HOT];

impl fmt::Display for ConditionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for ConditionProfile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cold" => Ok(COLD),
            "cool" => Ok(COOL),
            "moderate" => Ok(MODERATE),
            "hot" => Ok(HOT),
            other => Err(DomainError::UnknownConditionProfile(other.to_string())),
        }
    }
}
