use async_trait::async_trait;
use serde::Deserialize;

use crate::{DirectionsTransport, ProviderRequest, TransportError};

pub const DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// The subset of the Directions API answer we read.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub overview_polyline: Option<EncodedPolyline>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Leg {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub html_instructions: String,
    #[serde(default)]
    pub distance: Option<TextValue>,
    #[serde(default)]
    pub duration: Option<TextValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
}

pub struct GoogleDirectionsTransport {
    client: reqwest::Client,
    url: String,
}

impl GoogleDirectionsTransport {
    pub fn new() -> Self {
        Self::with_url(DIRECTIONS_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for GoogleDirectionsTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectionsTransport for GoogleDirectionsTransport {
    async fn send(&self, request: &ProviderRequest) -> Result<DirectionsResponse, TransportError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("origin", request.origin.to_string()),
                ("destination", request.destination.to_string()),
                ("mode", request.mode.to_owned()),
                ("key", request.api_key.clone()),
            ])
            .send()
            .await?;

        let status_code = response.status();
        if !status_code.is_success() {
            return Err(TransportError::InvalidResponse {
                status_code,
                response: response.text().await.ok(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_parts_default() {
        let response: DirectionsResponse = serde_json::from_str(
            r#"{"status": "OK", "routes": [{"legs": [{"steps": [{"html_instructions": "Go"}]}]}]}"#,
        )
        .unwrap();
        let route = &response.routes[0];
        assert!(route.overview_polyline.is_none());
        assert!(route.legs[0].steps[0].distance.is_none());
        assert!(response.error_message.is_none());
    }

    #[test]
    fn status_is_required() {
        assert!(serde_json::from_str::<DirectionsResponse>(r#"{"routes": []}"#).is_err());
    }
}
