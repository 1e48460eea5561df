//! Configuration management for himmel.
//!
//! TOML file under the platform config directory, created with defaults
//! on first run. Validation separates hard errors (the app refuses to
//! start) from warnings (logged, then ignored).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One failed or suspect validation check.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of validating a [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(ConfigValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ConfigValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Where the dashboard observes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Pinned latitude; leave unset to use IP geolocation.
    pub latitude: Option<f64>,
    /// Pinned longitude; must be set together with `latitude`.
    pub longitude: Option<f64>,
    /// Display name shown instead of a reverse-geocoded one.
    pub place_name: Option<String>,
}

/// Data acquisition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Minutes between refreshes; 0 fetches once and stops.
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,
    #[serde(default = "default_weather_api_url")]
    pub weather_api_url: String,
    #[serde(default = "default_geocode_api_url")]
    pub geocode_api_url: String,
    #[serde(default = "default_locate_api_url")]
    pub locate_api_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            refresh_minutes: default_refresh_minutes(),
            weather_api_url: default_weather_api_url(),
            geocode_api_url: default_geocode_api_url(),
            locate_api_url: default_locate_api_url(),
        }
    }
}

/// Forecast presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Hours between hourly-strip samples.
    #[serde(default = "default_hourly_step_hours")]
    pub hourly_step_hours: usize,
    /// Number of samples on the hourly strip.
    #[serde(default = "default_hourly_points")]
    pub hourly_points: usize,
    /// Days shown in the multi-day forecast, today excluded.
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            hourly_step_hours: default_hourly_step_hours(),
            hourly_points: default_hourly_points(),
            forecast_days: default_forecast_days(),
        }
    }
}

fn default_refresh_minutes() -> u32 {
    15
}

fn default_weather_api_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocode_api_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_locate_api_url() -> String {
    "https://ipapi.co".to_string()
}

fn default_hourly_step_hours() -> usize {
    3
}

fn default_hourly_points() -> usize {
    8
}

fn default_forecast_days() -> usize {
    5
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub scene: SceneConfig,
}

impl Config {
    /// Load the config file, creating it with defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load and validate; errors abort, warnings get logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }
        if !validation.is_valid() {
            anyhow::bail!("Invalid configuration: {}", validation.error_summary());
        }

        Ok((config, validation))
    }

    /// Persist the current configuration.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No config file found, creating defaults at {:?}", path);
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {:?}", path))?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("himmel").join("config.toml"))
    }

    /// Check the configuration for errors and suspect values.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) {
                    result.add_error("location.latitude", "must be between -90 and 90");
                }
                if !(-180.0..=180.0).contains(&longitude) {
                    result.add_error("location.longitude", "must be between -180 and 180");
                }
            }
            (None, None) => {
                if self.location.place_name.is_some() {
                    result.add_warning(
                        "location.place_name",
                        "ignored without pinned coordinates",
                    );
                }
            }
            _ => {
                result.add_error(
                    "location",
                    "latitude and longitude must be configured together",
                );
            }
        }

        if self.weather.refresh_minutes == 0 {
            result.add_warning("weather.refresh_minutes", "0 disables the refresh loop");
        } else if self.weather.refresh_minutes > 24 * 60 {
            result.add_warning("weather.refresh_minutes", "longer than a day");
        }

        self.validate_url(&self.weather.weather_api_url, "weather.weather_api_url", &mut result);
        self.validate_url(&self.weather.geocode_api_url, "weather.geocode_api_url", &mut result);
        self.validate_url(&self.weather.locate_api_url, "weather.locate_api_url", &mut result);

        if self.scene.hourly_step_hours == 0 {
            result.add_error("scene.hourly_step_hours", "must be at least 1");
        }
        if self.scene.hourly_points == 0 {
            result.add_warning("scene.hourly_points", "0 hides the hourly strip");
        }
        if self.scene.forecast_days == 0 {
            result.add_warning("scene.forecast_days", "0 hides the multi-day forecast");
        } else if self.scene.forecast_days > 6 {
            result.add_warning(
                "scene.forecast_days",
                "the feed provides at most 6 days beyond today",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field: &str, result: &mut ValidationResult) {
        match url::Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(field, "must use http or https");
                }
                if url.host_str().is_none() {
                    result.add_error(field, "missing host");
                }
            }
            Err(_) => {
                result.add_error(field, "not a valid URL");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let validation = Config::default().validate();
        assert!(validation.is_valid());
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn bad_api_url_is_an_error() {
        let mut config = Config::default();
        config.weather.weather_api_url = "not a url".to_string();
        let validation = config.validate();
        assert!(!validation.is_valid());
        assert!(validation.error_summary().contains("weather_api_url"));
    }

    #[test]
    fn non_http_scheme_is_an_error() {
        let mut config = Config::default();
        config.weather.geocode_api_url = "ftp://example.com".to_string();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn half_pinned_coordinates_are_an_error() {
        let mut config = Config::default();
        config.location.latitude = Some(53.55);
        let validation = config.validate();
        assert!(!validation.is_valid());
        assert!(validation.error_summary().contains("together"));
    }

    #[test]
    fn out_of_range_coordinates_are_errors() {
        let mut config = Config::default();
        config.location.latitude = Some(91.0);
        config.location.longitude = Some(200.0);
        let validation = config.validate();
        assert_eq!(validation.errors.len(), 2);
    }

    #[test]
    fn pinned_coordinates_in_range_are_valid() {
        let mut config = Config::default();
        config.location.latitude = Some(-33.87);
        config.location.longitude = Some(151.21);
        config.location.place_name = Some("Sydney".to_string());
        let validation = config.validate();
        assert!(validation.is_valid());
        assert!(validation.warnings.is_empty());
    }

    #[test]
    fn zero_refresh_warns_but_passes() {
        let mut config = Config::default();
        config.weather.refresh_minutes = 0;
        let validation = config.validate();
        assert!(validation.is_valid());
        assert_eq!(validation.warnings.len(), 1);
    }

    #[test]
    fn orphaned_place_name_warns() {
        let mut config = Config::default();
        config.location.place_name = Some("Nowhere".to_string());
        let validation = config.validate();
        assert!(validation.is_valid());
        assert!(!validation.warnings.is_empty());
    }

    #[test]
    fn zero_step_hours_is_an_error() {
        let mut config = Config::default();
        config.scene.hourly_step_hours = 0;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn oversized_forecast_warns() {
        let mut config = Config::default();
        config.scene.forecast_days = 10;
        let validation = config.validate();
        assert!(validation.is_valid());
        assert_eq!(validation.warnings.len(), 1);
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("himmel").join("config.toml");

        let mut config = Config::default();
        config.location.latitude = Some(53.55);
        config.location.longitude = Some(9.99);
        config.weather.refresh_minutes = 30;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_creates_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[weather]\nrefresh_minutes = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.refresh_minutes, 5);
        assert_eq!(config.scene.hourly_points, 8);
        assert_eq!(config.weather.weather_api_url, "https://api.open-meteo.com");
    }
}
