//! Weather data acquisition and shaping for himmel
//!
//! Talks to Open-Meteo for forecasts, ipapi.co for IP geolocation, and
//! Nominatim for reverse geocoding, then condenses the raw series into
//! the samples the dashboard renders. [`service::DashboardService`] ties
//! the pieces together into one sequential refresh cycle.

pub mod forecast;
pub mod geocode;
pub mod locate;
pub mod openmeteo;
pub mod service;
pub mod types;

pub use forecast::{normalize_range, sample_hourly, summarize_daily, TempRange};
pub use geocode::{coordinate_label, reverse_geocode};
pub use locate::IpLocator;
pub use openmeteo::OpenMeteoClient;
pub use service::{Dashboard, DashboardService, RefreshError, ServiceOptions};
pub use types::{
    DailySample, DailySeries, HourlySample, HourlySeries, Location, LocationError, WeatherError,
    WeatherSnapshot,
};
