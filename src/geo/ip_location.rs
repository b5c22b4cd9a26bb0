//! IP-based geolocation
//!
//! Uses ip-api.com to approximate the device position from its public
//! address. This is the only "device location" a terminal has.

use crate::constants::api::IP_API_URL;
use crate::coord::Coordinates;
use crate::geo::{DeviceLocator, LocationFailure};
use serde::Deserialize;
use tracing::debug;

/// IP location service
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    endpoint: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpLocator {
    /// Create a new IP locator using ip-api.com
    pub fn new() -> Self {
        Self::with_endpoint(IP_API_URL)
    }

    /// Create an IP locator against a specific endpoint
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    /// Extract a position from an ip-api.com response
    fn interpret(data: IpApiResponse) -> Result<Coordinates, LocationFailure> {
        if data.status != "success" {
            return Err(LocationFailure::Other(format!(
                "IP location lookup failed: {}",
                data.message.as_deref().unwrap_or("unknown reason")
            )));
        }

        let (Some(lat), Some(lng)) = (data.lat, data.lon) else {
            return Err(LocationFailure::Other(
                "IP location response has no coordinates".to_string(),
            ));
        };

        let coords = Coordinates::new(lat, lng);
        coords
            .validate()
            .map_err(|e| LocationFailure::Other(e.to_string()))?;

        debug!(
            "IP location resolved to {} ({})",
            coords,
            data.city.as_deref().unwrap_or("unknown city")
        );
        Ok(coords)
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceLocator for IpLocator {
    async fn locate(&self) -> Result<Coordinates, LocationFailure> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| LocationFailure::Other(format!("IP location request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(LocationFailure::PermissionDenied);
        }

        if !response.status().is_success() {
            return Err(LocationFailure::Other(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            LocationFailure::Other(format!("Failed to parse IP location response: {}", e))
        })?;

        Self::interpret(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    fn parse(json: serde_json::Value) -> Result<Coordinates, LocationFailure> {
        IpLocator::interpret(serde_json::from_value(json).unwrap())
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/json", addr)
    }

    #[test]
    fn test_interpret_success() {
        let coords = parse(serde_json::json!({
            "status": "success",
            "lat": 17.385,
            "lon": 78.4867,
            "city": "Hyderabad"
        }))
        .unwrap();
        assert_eq!(coords, Coordinates::new(17.385, 78.4867));
    }

    #[test]
    fn test_interpret_fail_status() {
        let result = parse(serde_json::json!({"status": "fail", "message": "private range"}));
        match result {
            Err(LocationFailure::Other(message)) => assert!(message.contains("private range")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_interpret_missing_coordinates() {
        let result = parse(serde_json::json!({"status": "success", "lat": 17.385}));
        assert!(matches!(result, Err(LocationFailure::Other(_))));
    }

    #[tokio::test]
    async fn test_locate_from_endpoint() {
        let endpoint = serve(Router::new().route(
            "/json",
            get(|| async {
                Json(serde_json::json!({
                    "status": "success",
                    "lat": 40.7128,
                    "lon": -74.006,
                    "city": "New York"
                }))
            }),
        ))
        .await;

        let coords = IpLocator::with_endpoint(&endpoint).locate().await.unwrap();
        assert_eq!(coords, Coordinates::new(40.7128, -74.006));
    }

    #[tokio::test]
    async fn test_forbidden_is_permission_denied() {
        let endpoint = serve(Router::new().route("/json", get(|| async { StatusCode::FORBIDDEN })))
            .await;

        let result = IpLocator::with_endpoint(&endpoint).locate().await;
        assert_eq!(result, Err(LocationFailure::PermissionDenied));
    }
}
