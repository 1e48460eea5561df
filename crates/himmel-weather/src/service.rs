//! Refresh orchestration.
//!
//! One [`DashboardService::refresh`] call runs the whole pipeline in
//! sequence, from locating the observer through fetch and scene
//! resolution to naming the place, then publishes the result. Refreshes
//! are generation-counted: starting a new one invalidates every refresh
//! still in flight, so a slow response can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::instrument;

use himmel_scene::{resolve_theme, SkyState, ThemeDescriptor, WeatherObservation};

use crate::forecast::{sample_hourly, summarize_daily};
use crate::geocode::{coordinate_label, reverse_geocode, NOMINATIM_BASE};
use crate::locate::{IpLocator, IP_API_BASE};
use crate::openmeteo::{OpenMeteoClient, OPEN_METEO_BASE};
use crate::types::{DailySample, HourlySample, Location, LocationError, WeatherError};

/// Errors that can end a refresh cycle.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),
    #[error("Refresh superseded by a newer request")]
    Superseded,
}

impl RefreshError {
    /// Stable text for the UI; details stay in logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            RefreshError::Location(e) => e.user_message(),
            RefreshError::Weather(e) => e.user_message(),
            RefreshError::Superseded => "A newer refresh is already in progress.",
        }
    }
}

/// Endpoints and sampling knobs for [`DashboardService`].
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub weather_base_url: String,
    pub geocode_base_url: String,
    pub locate_base_url: String,
    /// Skips IP geolocation entirely when set.
    pub fixed_location: Option<Location>,
    pub hourly_step_hours: usize,
    pub hourly_points: usize,
    pub forecast_days: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        ServiceOptions {
            weather_base_url: OPEN_METEO_BASE.to_string(),
            geocode_base_url: NOMINATIM_BASE.to_string(),
            locate_base_url: IP_API_BASE.to_string(),
            fixed_location: None,
            hourly_step_hours: 3,
            hourly_points: 8,
            forecast_days: 5,
        }
    }
}

/// Everything the presentation layer needs for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub location: Location,
    /// Resolved place name, or formatted coordinates as fallback.
    pub place: String,
    pub current: WeatherObservation,
    pub sky: SkyState,
    pub theme: ThemeDescriptor,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailySample>,
    pub refreshed_at: DateTime<Utc>,
}

/// Owns the clients and the latest published dashboard.
pub struct DashboardService {
    weather: OpenMeteoClient,
    locator: IpLocator,
    geocode_base_url: String,
    fixed_location: Option<Location>,
    hourly_step_hours: usize,
    hourly_points: usize,
    forecast_days: usize,
    generation: AtomicU64,
    published: RwLock<Option<Dashboard>>,
}

impl DashboardService {
    pub fn new(options: ServiceOptions) -> Result<Self, RefreshError> {
        let weather = OpenMeteoClient::new(&options.weather_base_url)?;
        let locator = IpLocator::new(&options.locate_base_url)?;
        Ok(Self {
            weather,
            locator,
            geocode_base_url: options.geocode_base_url,
            fixed_location: options.fixed_location,
            hourly_step_hours: options.hourly_step_hours,
            hourly_points: options.hourly_points,
            forecast_days: options.forecast_days,
            generation: AtomicU64::new(0),
            published: RwLock::new(None),
        })
    }

    /// Run one full refresh cycle and publish the result.
    ///
    /// `now_local` is naive local time at the observer (matching the
    /// feed's timestamps); `now_utc` drives the moon phase. Returns
    /// [`RefreshError::Superseded`] when a newer refresh started while
    /// this one was in flight; the newer one owns the published slot.
    #[instrument(skip(self, now_local, now_utc), level = "info")]
    pub async fn refresh(
        &self,
        now_local: NaiveDateTime,
        now_utc: DateTime<Utc>,
    ) -> Result<Dashboard, RefreshError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Starting refresh generation {}", generation);

        let location = match &self.fixed_location {
            Some(pinned) => pinned.clone(),
            None => self.locator.locate().await?,
        };

        let snapshot = self.weather.fetch(&location).await?;
        let sky = SkyState::observe(now_utc, snapshot.sunrise(), snapshot.sunset());
        let theme = resolve_theme(&snapshot.current, &sky, now_local);
        let hourly = sample_hourly(
            &snapshot.hourly,
            now_local,
            self.hourly_step_hours,
            self.hourly_points,
        );
        // Daily index 0 is today, already shown as current conditions.
        let daily = summarize_daily(&snapshot.daily, 1, self.forecast_days);

        let place = match reverse_geocode(&self.geocode_base_url, &location).await {
            Some(name) => name,
            None => coordinate_label(location.latitude, location.longitude),
        };

        let dashboard = Dashboard {
            location,
            place,
            current: snapshot.current,
            sky,
            theme,
            hourly,
            daily,
            refreshed_at: now_utc,
        };

        let mut published = self.published.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Refresh generation {} superseded, discarding", generation);
            return Err(RefreshError::Superseded);
        }
        *published = Some(dashboard.clone());
        tracing::info!("Published dashboard for {}", dashboard.place);
        Ok(dashboard)
    }

    /// Latest successfully published dashboard, if any.
    pub fn current(&self) -> Option<Dashboard> {
        self.published.read().clone()
    }
}
