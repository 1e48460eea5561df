//! Reverse geocoding: coordinates to a human-readable place name.
//!
//! Uses Nominatim (OpenStreetMap). Naming is cosmetic, so this is
//! best-effort only: every failure path logs and returns `None`, and the
//! caller falls back to showing coordinates.

use std::time::Duration;

use serde::Deserialize;

use crate::types::Location;

/// Production endpoint.
pub const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";

const REQUEST_TIMEOUT_SECS: u64 = 10;

// Nominatim's usage policy requires an identifying agent.
const USER_AGENT: &str = "himmel/0.1.0";

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
}

/// Resolve a display name for a location.
///
/// A pinned `place_name` short-circuits the lookup entirely.
pub async fn reverse_geocode(base_url: &str, location: &Location) -> Option<String> {
    if location.place_name.is_some() {
        return location.place_name.clone();
    }

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to create geocoding client: {}", e);
            return None;
        }
    };

    let url = format!(
        "{}/reverse?format=json&lat={}&lon={}",
        base_url, location.latitude, location.longitude
    );
    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Reverse geocoding request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Reverse geocoding returned status {}", response.status());
        return None;
    }

    let body: NominatimResponse = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Failed to parse reverse geocoding response: {}", e);
            return None;
        }
    };

    // Most specific settlement name wins.
    let address = body.address?;
    let place = address
        .city
        .or(address.town)
        .or(address.village)
        .or(address.municipality)?;
    tracing::debug!("Reverse geocoded to {}", place);
    Some(place)
}

/// Fallback label when no name can be resolved.
pub fn coordinate_label(latitude: f64, longitude: f64) -> String {
    format!("{:.2}, {:.2}", latitude, longitude)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn location(latitude: f64, longitude: f64) -> Location {
        Location {
            latitude,
            longitude,
            place_name: None,
        }
    }

    async fn mount_address(server: &MockServer, address: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "address": address })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn city_wins_over_broader_names() {
        let server = MockServer::start().await;
        mount_address(
            &server,
            json!({ "city": "Hamburg", "town": "Altona", "municipality": "HH" }),
        )
        .await;

        let name = reverse_geocode(&server.uri(), &location(53.55, 9.99)).await;
        assert_eq!(name, Some("Hamburg".to_string()));
    }

    #[tokio::test]
    async fn town_and_village_fill_in_for_missing_city() {
        let server = MockServer::start().await;
        mount_address(&server, json!({ "town": "Buxtehude" })).await;
        let name = reverse_geocode(&server.uri(), &location(53.46, 9.68)).await;
        assert_eq!(name, Some("Buxtehude".to_string()));

        let server = MockServer::start().await;
        mount_address(
            &server,
            json!({ "village": "Sieseby", "municipality": "Thumby" }),
        )
        .await;
        let name = reverse_geocode(&server.uri(), &location(54.6, 9.9)).await;
        assert_eq!(name, Some("Sieseby".to_string()));
    }

    #[tokio::test]
    async fn empty_address_yields_none() {
        let server = MockServer::start().await;
        mount_address(&server, json!({})).await;
        let name = reverse_geocode(&server.uri(), &location(0.0, 0.0)).await;
        assert_eq!(name, None);
    }

    #[tokio::test]
    async fn server_errors_yield_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let name = reverse_geocode(&server.uri(), &location(53.55, 9.99)).await;
        assert_eq!(name, None);
    }

    #[tokio::test]
    async fn pinned_name_skips_the_lookup() {
        // No server at all: a request would fail the test by returning None.
        let pinned = Location {
            latitude: 53.55,
            longitude: 9.99,
            place_name: Some("Home".to_string()),
        };
        let name = reverse_geocode("http://127.0.0.1:9", &pinned).await;
        assert_eq!(name, Some("Home".to_string()));
    }

    #[test]
    fn coordinate_label_rounds_to_two_decimals() {
        assert_eq!(coordinate_label(53.5511, 9.9937), "53.55, 9.99");
        assert_eq!(coordinate_label(-33.8688, 151.2093), "-33.87, 151.21");
    }
}
