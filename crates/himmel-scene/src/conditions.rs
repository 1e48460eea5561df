//! WMO weather-code classification and display mappings.

use serde::{Deserialize, Serialize};

/// Current conditions at the observed location.
///
/// Immutable snapshot; a refresh replaces the whole value rather than
/// mutating fields in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// WMO present-weather code (0..=99, sparse valid set).
    pub code: i32,
    pub is_day: bool,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
}

/// Weather condition categories mapped from WMO codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Fog,
    Rain,
    Snow,
    RainShowers,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Convert a WMO weather code to its condition category.
    ///
    /// Total over all integers: codes outside the published set map to
    /// `Unknown` rather than failing.
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            45 | 48 => Self::Fog,
            51..=67 => Self::Rain,
            71..=77 => Self::Snow,
            80..=82 => Self::RainShowers,
            85..=86 => Self::Snow,
            95..=99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Symbolic icon identifier for this category.
    pub fn icon_key(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud-sun",
            Self::Fog => "smog",
            Self::Rain => "cloud-rain",
            Self::Snow => "snowflake",
            Self::RainShowers => "cloud-showers-heavy",
            Self::Thunderstorm => "bolt",
            Self::Unknown => "cloud",
        }
    }
}

/// Per-code display text, one row per published WMO code.
///
/// New codes are added here; call sites go through [`describe_code`] and
/// never match on codes themselves.
const CODE_DESCRIPTIONS: &[(i32, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (71, "Slight snowfall"),
    (73, "Moderate snowfall"),
    (75, "Heavy snowfall"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Human-readable description for a WMO weather code.
pub fn describe_code(code: i32) -> &'static str {
    CODE_DESCRIPTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
        .unwrap_or("Unknown conditions")
}

/// Icon identifier for a WMO weather code, with a generic fallback.
pub fn icon_for_code(code: i32) -> &'static str {
    WeatherCondition::from_wmo_code(code).icon_key()
}
