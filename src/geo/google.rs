//! Google Geocoding backend
//!
//! Reverse lookups: GET <endpoint>?latlng=<lat>,<lng>&key=<key>.
//! The first result's `formatted_address` is the address.

use crate::coord::Coordinates;
use crate::geo::{GeocodeFailure, ReverseGeocoder};
use serde::Deserialize;
use tracing::{debug, warn};

/// Google Geocoding API backend
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

/// Geocoding API response envelope
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
}

impl GoogleGeocoder {
    /// Create a new backend
    ///
    /// An empty or missing key is accepted here and reported on every lookup.
    pub fn new(api_key: Option<String>, endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint: endpoint.to_string(),
        }
    }

    /// True if an API key is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Turn a decoded response into an address or a failure reason
    fn interpret(response: GeocodeResponse) -> Result<String, GeocodeFailure> {
        match response.status.as_str() {
            "OK" => response
                .results
                .into_iter()
                .next()
                .map(|result| result.formatted_address)
                .filter(|address| !address.is_empty())
                .ok_or(GeocodeFailure::ZeroResults),
            "ZERO_RESULTS" => Err(GeocodeFailure::ZeroResults),
            status => {
                if let Some(message) = &response.error_message {
                    warn!("Geocoding service returned {}: {}", status, message);
                }
                Err(GeocodeFailure::Status(status.to_string()))
            }
        }
    }
}

impl ReverseGeocoder for GoogleGeocoder {
    async fn reverse_geocode(&self, coords: Coordinates) -> Result<String, GeocodeFailure> {
        let Some(key) = &self.api_key else {
            return Err(GeocodeFailure::MissingCredential);
        };

        let latlng = format!("{},{}", coords.lat, coords.lng);
        debug!("Reverse geocoding {}", latlng);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("latlng", latlng.as_str()), ("key", key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeFailure::Status(format!(
                "HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeFailure::Transport(format!("Failed to parse response: {}", e)))?;

        Self::interpret(body)
    }
}
