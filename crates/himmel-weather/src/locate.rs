//! IP-based geolocation.
//!
//! Coarse city-level accuracy is plenty for a weather forecast, and an
//! IP lookup needs no platform permission prompt. Users who want exact
//! coordinates pin them in the config instead.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Location, LocationError};

/// Production endpoint.
pub const IP_API_BASE: &str = "https://ipapi.co";

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// HTTP client for the ipapi.co geolocation service.
pub struct IpLocator {
    client: reqwest::Client,
    base_url: String,
}

impl IpLocator {
    pub fn new(base_url: &str) -> Result<Self, LocationError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, LocationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LocationError::Other(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Locate this machine by its public IP.
    #[instrument(skip(self), level = "info")]
    pub async fn locate(&self) -> Result<Location, LocationError> {
        let url = format!("{}/json/", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LocationError::Timeout
            } else {
                LocationError::ServiceUnavailable
            }
        })?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Geolocation service refused the request: {}", status);
            return Err(LocationError::PermissionDenied);
        }
        if !status.is_success() {
            tracing::warn!("Geolocation service returned status {}", status);
            return Err(LocationError::ServiceUnavailable);
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Other(format!("geolocation decode failed: {}", e)))?;

        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) => {
                tracing::info!("Located via IP: {}, {}", latitude, longitude);
                Ok(Location {
                    latitude,
                    longitude,
                    place_name: None,
                })
            }
            _ => Err(LocationError::Other(
                "geolocation response missing coordinates".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_status(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn locate_parses_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ip": "203.0.113.9",
                "city": "Hamburg",
                "latitude": 53.5511,
                "longitude": 9.9937
            })))
            .mount(&server)
            .await;

        let location = IpLocator::new(&server.uri()).unwrap().locate().await.unwrap();
        assert_eq!(location.latitude, 53.5511);
        assert_eq!(location.longitude, 9.9937);
        assert_eq!(location.place_name, None);
    }

    #[tokio::test]
    async fn forbidden_maps_to_permission_denied() {
        let server = MockServer::start().await;
        mount_status(&server, 403).await;
        let result = IpLocator::new(&server.uri()).unwrap().locate().await;
        assert!(matches!(result, Err(LocationError::PermissionDenied)));
    }

    #[tokio::test]
    async fn rate_limiting_maps_to_permission_denied() {
        let server = MockServer::start().await;
        mount_status(&server, 429).await;
        let result = IpLocator::new(&server.uri()).unwrap().locate().await;
        assert!(matches!(result, Err(LocationError::PermissionDenied)));
    }

    #[tokio::test]
    async fn server_errors_map_to_unavailable() {
        let server = MockServer::start().await;
        mount_status(&server, 502).await;
        let result = IpLocator::new(&server.uri()).unwrap().locate().await;
        assert!(matches!(result, Err(LocationError::ServiceUnavailable)));
    }

    #[tokio::test]
    async fn missing_coordinates_map_to_other() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ip": "203.0.113.9",
                "latitude": 53.5511
            })))
            .mount(&server)
            .await;

        let result = IpLocator::new(&server.uri()).unwrap().locate().await;
        assert!(matches!(result, Err(LocationError::Other(_))));
    }

    #[tokio::test]
    async fn slow_responses_map_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "latitude": 1.0, "longitude": 2.0 }))
                    .set_delay(Duration::from_millis(250)),
            )
            .mount(&server)
            .await;

        let locator =
            IpLocator::with_timeout(&server.uri(), Duration::from_millis(50)).unwrap();
        let result = locator.locate().await;
        assert!(matches!(result, Err(LocationError::Timeout)));
    }
}
