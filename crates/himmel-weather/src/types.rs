//! Data model shared by the weather clients and the refresh service.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use himmel_scene::WeatherObservation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geographic position, optionally with a pinned display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// When set, reverse geocoding is skipped and this name is shown.
    pub place_name: Option<String>,
}

/// Hourly forecast series, kept as the parallel arrays the feed ships:
/// index `i` across all arrays describes the same instant, and `time`
/// ascends. Alignment is validated when the payload is decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<NaiveDateTime>,
    pub temperature_2m: Vec<f64>,
    pub weathercode: Vec<i32>,
}

impl HourlySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Daily forecast series as parallel arrays; index 0 is today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub weathercode: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub sunrise: Vec<NaiveDateTime>,
    pub sunset: Vec<NaiveDateTime>,
}

impl DailySeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// One point of the rendered hourly strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub code: i32,
}

/// One row of the rendered multi-day forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySample {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub code: i32,
}

/// Everything one forecast fetch returns.
///
/// All embedded times are naive local time at the observed location, as
/// reported by the feed; `fetched_at` alone is UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: WeatherObservation,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Today's sunrise, if the daily series has at least one row.
    pub fn sunrise(&self) -> Option<NaiveDateTime> {
        self.daily.sunrise.first().copied()
    }

    /// Today's sunset, if the daily series has at least one row.
    pub fn sunset(&self) -> Option<NaiveDateTime> {
        self.daily.sunset.first().copied()
    }
}

/// Errors from determining the observer's position.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location access denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

impl LocationError {
    /// Stable text for the UI; details stay in logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location access was denied. Configure a fixed location instead."
            }
            LocationError::ServiceUnavailable => {
                "Could not determine your location. Check your connection."
            }
            LocationError::Timeout => "Location lookup timed out. Please try again.",
            LocationError::Other(_) => "Could not determine your location.",
        }
    }
}

/// Errors from fetching or decoding forecast data.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    /// Stable text for the UI; details stay in logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => {
                "Unable to reach the weather service. Check your connection."
            }
            WeatherError::Api { .. } => {
                "The weather service returned an error. Please try again later."
            }
            WeatherError::MalformedResponse(_) => {
                "Received an unexpected response from the weather service."
            }
        }
    }
}
