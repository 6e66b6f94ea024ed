//! Unit conversions from raw sensor output to human-readable indices and
//! categories. Pure functions, no I/O.

use std::fmt;

/// Photodiode voltage thresholds (millivolts) for UV index 0 through 11.
/// A voltage strictly below `UV_INDEX_THRESHOLDS[i]` maps to index `i`;
/// anything at or above the last threshold maps to index 12.
const UV_INDEX_THRESHOLDS: [f64; 12] = [
    50.0, 227.0, 318.0, 408.0, 503.0, 606.0, 696.0, 795.0, 881.0, 976.0, 1079.0, 1170.0,
];

/// Convert a UV sensor voltage to the standard UV index (0 to 12).
///
/// Monotonic step function of the voltage. Negative voltages fall in the
/// lowest bucket and map to index 0.
pub fn uv_index_from_voltage(voltage: f64) -> u8 {
    for (index, threshold) in UV_INDEX_THRESHOLDS.iter().enumerate() {
        if voltage < *threshold {
            return index as u8;
        }
    }
    12
}

/// Exposure categories for the UV index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvCategory {
    None,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl UvCategory {
    /// Category for a UV index. Indices above the 0 to 12 scale saturate
    /// into `VeryHigh`.
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Self::None,
            1..=2 => Self::Low,
            3..=5 => Self::Moderate,
            6..=7 => Self::High,
            _ => Self::VeryHigh,
        }
    }
}

impl fmt::Display for UvCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        };
        write!(f, "{}", label)
    }
}

/// Air-quality categories for the pollutant concentration reported by the
/// gas sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQualityCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    Invalid,
}

impl AirQualityCategory {
    /// Bucket a pollutant reading into the published category table.
    ///
    /// The table bounds are inclusive integers (0 to 50 is Good, 51 to 100
    /// is Moderate, and so on), so the reading is rounded to the nearest
    /// whole number before the comparison. Without the rounding a value
    /// like 50.4 would sit between two buckets and match neither. Negative
    /// and non-finite readings are invalid.
    pub fn from_ppm(ppm: f64) -> Self {
        if ppm < 0.0 || !ppm.is_finite() {
            return Self::Invalid;
        }
        match ppm.round() as i64 {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthySensitive,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }
}

impl fmt::Display for AirQualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
            Self::Invalid => "Invalid reading",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_index_boundaries() {
        // One case on each side of every threshold.
        let cases = [
            (49.0, 0),
            (50.0, 1),
            (226.0, 1),
            (227.0, 2),
            (317.0, 2),
            (318.0, 3),
            (407.0, 3),
            (408.0, 4),
            (502.0, 4),
            (503.0, 5),
            (605.0, 5),
            (606.0, 6),
            (695.0, 6),
            (696.0, 7),
            (794.0, 7),
            (795.0, 8),
            (880.0, 8),
            (881.0, 9),
            (975.0, 9),
            (976.0, 10),
            (1078.0, 10),
            (1079.0, 11),
            (1169.0, 11),
            (1170.0, 12),
        ];
        for (voltage, expected) in cases {
            assert_eq!(
                uv_index_from_voltage(voltage),
                expected,
                "voltage {} should map to index {}",
                voltage,
                expected
            );
        }
    }

    #[test]
    fn test_uv_index_extremes() {
        assert_eq!(uv_index_from_voltage(-10.0), 0);
        assert_eq!(uv_index_from_voltage(0.0), 0);
        assert_eq!(uv_index_from_voltage(5000.0), 12);
    }

    #[test]
    fn test_uv_index_is_monotonic() {
        let mut previous = 0;
        let mut voltage = 0.0;
        while voltage <= 1300.0 {
            let index = uv_index_from_voltage(voltage);
            assert!(
                index >= previous,
                "index dropped from {} to {} at {} mV",
                previous,
                index,
                voltage
            );
            previous = index;
            voltage += 0.5;
        }
    }

    #[test]
    fn test_uv_categories() {
        assert_eq!(UvCategory::from_index(0), UvCategory::None);
        assert_eq!(UvCategory::from_index(1), UvCategory::Low);
        assert_eq!(UvCategory::from_index(2), UvCategory::Low);
        assert_eq!(UvCategory::from_index(3), UvCategory::Moderate);
        assert_eq!(UvCategory::from_index(5), UvCategory::Moderate);
        assert_eq!(UvCategory::from_index(6), UvCategory::High);
        assert_eq!(UvCategory::from_index(7), UvCategory::High);
        assert_eq!(UvCategory::from_index(8), UvCategory::VeryHigh);
        assert_eq!(UvCategory::from_index(12), UvCategory::VeryHigh);
    }

    #[test]
    fn test_air_quality_category_table() {
        let cases = [
            (0.0, AirQualityCategory::Good),
            (50.0, AirQualityCategory::Good),
            (51.0, AirQualityCategory::Moderate),
            (100.0, AirQualityCategory::Moderate),
            (101.0, AirQualityCategory::UnhealthySensitive),
            (150.0, AirQualityCategory::UnhealthySensitive),
            (151.0, AirQualityCategory::Unhealthy),
            (200.0, AirQualityCategory::Unhealthy),
            (201.0, AirQualityCategory::VeryUnhealthy),
            (300.0, AirQualityCategory::VeryUnhealthy),
            (301.0, AirQualityCategory::Hazardous),
            (500.0, AirQualityCategory::Hazardous),
        ];
        for (ppm, expected) in cases {
            assert_eq!(
                AirQualityCategory::from_ppm(ppm),
                expected,
                "{} ppm should be {:?}",
                ppm,
                expected
            );
        }
    }

    #[test]
    fn test_negative_and_non_finite_ppm_is_invalid() {
        assert_eq!(AirQualityCategory::from_ppm(-1.0), AirQualityCategory::Invalid);
        assert_eq!(AirQualityCategory::from_ppm(-0.4), AirQualityCategory::Invalid);
        assert_eq!(AirQualityCategory::from_ppm(f64::NAN), AirQualityCategory::Invalid);
        assert_eq!(
            AirQualityCategory::from_ppm(f64::INFINITY),
            AirQualityCategory::Invalid
        );
    }

    #[test]
    fn test_fractional_ppm_rounds_before_bucketing() {
        // 50.4 rounds down into Good, 50.5 rounds up into Moderate.
        assert_eq!(AirQualityCategory::from_ppm(50.4), AirQualityCategory::Good);
        assert_eq!(AirQualityCategory::from_ppm(50.5), AirQualityCategory::Moderate);
        assert_eq!(AirQualityCategory::from_ppm(100.4), AirQualityCategory::Moderate);
        assert_eq!(
            AirQualityCategory::from_ppm(100.5),
            AirQualityCategory::UnhealthySensitive
        );
        assert_eq!(AirQualityCategory::from_ppm(300.5), AirQualityCategory::Hazardous);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(AirQualityCategory::Good.to_string(), "Good");
        assert_eq!(
            AirQualityCategory::UnhealthySensitive.to_string(),
            "Unhealthy for Sensitive Groups"
        );
        assert_eq!(AirQualityCategory::Invalid.to_string(), "Invalid reading");
        assert_eq!(UvCategory::VeryHigh.to_string(), "Very High");
    }
}
