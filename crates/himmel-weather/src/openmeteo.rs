//! Open-Meteo forecast client.
//!
//! One GET per refresh: current conditions, the hourly temperature and
//! weather-code series, and the daily series with sun times. No API key
//! required. `timezone=auto` makes every timestamp naive local time at
//! the queried coordinates.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use himmel_scene::WeatherObservation;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{DailySeries, HourlySeries, Location, WeatherError, WeatherSnapshot};

/// Production endpoint.
pub const OPEN_METEO_BASE: &str = "https://api.open-meteo.com";

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the Open-Meteo forecast API.
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: &str) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch a full forecast snapshot for one location.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &Location) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true\
             &hourly=temperature_2m,weathercode\
             &daily=weathercode,temperature_2m_max,temperature_2m_min,sunrise,sunset\
             &timezone=auto",
            self.base_url, location.latitude, location.longitude
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Forecast request failed with status {}", status);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let payload: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::MalformedResponse(format!("decode failed: {}", e)))?;
        let snapshot = build_snapshot(payload)?;
        tracing::info!(
            "Fetched forecast: {} hourly points, {} daily rows",
            snapshot.hourly.len(),
            snapshot.daily.len()
        );
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeatherPayload,
    hourly: HourlyPayload,
    daily: DailyPayload,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherPayload {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct HourlyPayload {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weathercode: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct DailyPayload {
    time: Vec<String>,
    weathercode: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    sunrise: Vec<String>,
    sunset: Vec<String>,
}

fn build_snapshot(payload: ForecastResponse) -> Result<WeatherSnapshot, WeatherError> {
    let current = WeatherObservation {
        code: payload.current_weather.weathercode,
        is_day: payload.current_weather.is_day != 0,
        temperature_c: payload.current_weather.temperature,
        wind_speed_kmh: payload.current_weather.windspeed,
    };

    let hourly_len = payload.hourly.time.len();
    ensure_aligned("hourly.temperature_2m", hourly_len, payload.hourly.temperature_2m.len())?;
    ensure_aligned("hourly.weathercode", hourly_len, payload.hourly.weathercode.len())?;
    let hourly = HourlySeries {
        time: parse_all(&payload.hourly.time, parse_local_timestamp)?,
        temperature_2m: payload.hourly.temperature_2m,
        weathercode: payload.hourly.weathercode,
    };

    let daily_len = payload.daily.time.len();
    ensure_aligned("daily.weathercode", daily_len, payload.daily.weathercode.len())?;
    ensure_aligned(
        "daily.temperature_2m_max",
        daily_len,
        payload.daily.temperature_2m_max.len(),
    )?;
    ensure_aligned(
        "daily.temperature_2m_min",
        daily_len,
        payload.daily.temperature_2m_min.len(),
    )?;
    ensure_aligned("daily.sunrise", daily_len, payload.daily.sunrise.len())?;
    ensure_aligned("daily.sunset", daily_len, payload.daily.sunset.len())?;
    let daily = DailySeries {
        time: parse_all(&payload.daily.time, parse_local_date)?,
        weathercode: payload.daily.weathercode,
        temperature_2m_max: payload.daily.temperature_2m_max,
        temperature_2m_min: payload.daily.temperature_2m_min,
        sunrise: parse_all(&payload.daily.sunrise, parse_local_timestamp)?,
        sunset: parse_all(&payload.daily.sunset, parse_local_timestamp)?,
    };

    Ok(WeatherSnapshot {
        current,
        hourly,
        daily,
        fetched_at: Utc::now(),
    })
}

fn ensure_aligned(series: &str, expected: usize, actual: usize) -> Result<(), WeatherError> {
    if expected == actual {
        Ok(())
    } else {
        Err(WeatherError::MalformedResponse(format!(
            "{} has {} entries, expected {}",
            series, actual, expected
        )))
    }
}

fn parse_all<T>(
    values: &[String],
    parse: fn(&str) -> Result<T, WeatherError>,
) -> Result<Vec<T>, WeatherError> {
    values.iter().map(|v| parse(v)).collect()
}

/// Feed timestamps look like `2024-07-15T14:00`; seconds appear only in
/// some self-hosted instances.
fn parse_local_timestamp(value: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| WeatherError::MalformedResponse(format!("invalid timestamp: {}", value)))
}

fn parse_local_date(value: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| WeatherError::MalformedResponse(format!("invalid date: {}", value)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_body() -> serde_json::Value {
        json!({
            "latitude": 53.55,
            "longitude": 9.99,
            "current_weather": {
                "temperature": 18.4,
                "windspeed": 23.0,
                "weathercode": 61,
                "is_day": 1,
                "time": "2024-07-15T14:00"
            },
            "hourly": {
                "time": ["2024-07-15T13:00", "2024-07-15T14:00", "2024-07-15T15:00"],
                "temperature_2m": [17.9, 18.4, 18.1],
                "weathercode": [3, 61, 61]
            },
            "daily": {
                "time": ["2024-07-15", "2024-07-16"],
                "weathercode": [61, 3],
                "temperature_2m_max": [19.2, 21.0],
                "temperature_2m_min": [13.1, 12.4],
                "sunrise": ["2024-07-15T05:08", "2024-07-16T05:09"],
                "sunset": ["2024-07-15T21:47", "2024-07-16T21:46"]
            }
        })
    }

    async fn client_for(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(&server.uri()).unwrap()
    }

    fn hamburg() -> Location {
        Location {
            latitude: 53.55,
            longitude: 9.99,
            place_name: None,
        }
    }

    #[tokio::test]
    async fn fetch_parses_a_full_forecast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "53.55"))
            .and(query_param("longitude", "9.99"))
            .and(query_param("timezone", "auto"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let snapshot = client_for(&server).await.fetch(&hamburg()).await.unwrap();

        assert_eq!(snapshot.current.code, 61);
        assert!(snapshot.current.is_day);
        assert_eq!(snapshot.current.temperature_c, 18.4);
        assert_eq!(snapshot.current.wind_speed_kmh, 23.0);
        assert_eq!(snapshot.hourly.len(), 3);
        assert_eq!(
            snapshot.hourly.time[0],
            parse_local_timestamp("2024-07-15T13:00").unwrap()
        );
        assert_eq!(snapshot.daily.len(), 2);
        assert_eq!(
            snapshot.sunrise(),
            Some(parse_local_timestamp("2024-07-15T05:08").unwrap())
        );
        assert_eq!(
            snapshot.sunset(),
            Some(parse_local_timestamp("2024-07-15T21:47").unwrap())
        );
    }

    #[tokio::test]
    async fn fetch_maps_server_errors_to_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&hamburg()).await;
        match result {
            Err(WeatherError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Api error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn misaligned_series_is_malformed() {
        let mut body = forecast_body();
        body["hourly"]["temperature_2m"] = json!([17.9, 18.4]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&hamburg()).await;
        match result {
            Err(WeatherError::MalformedResponse(detail)) => {
                assert!(detail.contains("temperature_2m"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn unparseable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&hamburg()).await;
        assert!(matches!(result, Err(WeatherError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn invalid_timestamp_is_malformed() {
        let mut body = forecast_body();
        body["hourly"]["time"][1] = json!("not-a-time");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let result = client_for(&server).await.fetch(&hamburg()).await;
        match result {
            Err(WeatherError::MalformedResponse(detail)) => {
                assert!(detail.contains("not-a-time"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn timestamps_with_seconds_still_parse() {
        let parsed = parse_local_timestamp("2024-07-15T05:08:30").unwrap();
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "05:08:30");
    }
}
