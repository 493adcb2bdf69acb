use std::{env, error, fmt, sync::Arc};

use async_trait::async_trait;
use model::{
    coordinate::Coordinate,
    route::{RouteStep, WalkingRoute},
};

pub mod google;
pub mod query;
pub mod sanitize;

pub use google::{DirectionsResponse, GoogleDirectionsTransport};
pub use query::DirectionsQuery;

/// The only travel mode this gateway asks for.
pub const MODE: &str = "walking";

/// Why a directions request did not produce a route. "No route found" is not
/// an error; see [`WalkingRoute::no_route`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectionsError {
    /// Parameters absent or malformed. Raised before any network call.
    Input(String),
    /// No provider credential configured.
    MissingConfiguration,
    /// The provider answered with a non-success status.
    Provider { status: String, message: String },
    /// Network failure or unexpected response. Details are logged, not
    /// returned.
    Transport,
}

impl DirectionsError {
    pub fn kind(&self) -> &'static str {
        match self {
            DirectionsError::Input(_) => "missing-parameters",
            DirectionsError::MissingConfiguration => "missing-configuration",
            DirectionsError::Provider { .. } => "provider-error",
            DirectionsError::Transport => "transport-error",
        }
    }
}

impl error::Error for DirectionsError {}

impl fmt::Display for DirectionsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DirectionsError::Input(reason) => write!(f, "{}", reason),
            DirectionsError::MissingConfiguration => {
                write!(f, "Google Maps API key is missing")
            }
            DirectionsError::Provider { message, .. } => write!(f, "{}", message),
            DirectionsError::Transport => write!(f, "Error fetching directions"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TransportError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        response: Option<String>,
    },
}

impl error::Error for TransportError {}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            TransportError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            TransportError::InvalidResponse {
                status_code,
                response,
            } => match response {
                Some(text) => write!(f, "Invalid Response ({}): {}", status_code, text),
                None => write!(f, "Invalid Response ({})", status_code),
            },
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::JsonError(Arc::new(e))
    }
}

/// One outbound directions request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: &'static str,
    pub api_key: String,
}

/// Carries a [`ProviderRequest`] to the provider and returns its decoded
/// answer, whatever status it reports.
#[async_trait]
pub trait DirectionsTransport: Send + Sync {
    async fn send(&self, request: &ProviderRequest) -> Result<DirectionsResponse, TransportError>;
}

/// Reads the provider credential from the environment.
pub fn api_key_from_env() -> Option<String> {
    ["GOOGLE_MAPS_API_KEY", "NEXT_PUBLIC_GOOGLE_MAPS_API_KEY"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}

/// Fetches walking routes. Every call is one request; nothing is retried or
/// cached, and concurrent calls don't affect each other.
#[derive(Clone)]
pub struct DirectionsGateway {
    transport: Arc<dyn DirectionsTransport>,
    api_key: Option<String>,
}

impl DirectionsGateway {
    pub fn new(transport: Arc<dyn DirectionsTransport>, api_key: Option<String>) -> Self {
        Self { transport, api_key }
    }

    /// Google transport with the credential from the environment. A missing
    /// credential is reported per request, not here.
    pub fn google_from_env() -> Self {
        let api_key = api_key_from_env();
        if api_key.is_none() {
            log::warn!("GOOGLE_MAPS_API_KEY is not set, directions will be unavailable.");
        }
        Self::new(Arc::new(GoogleDirectionsTransport::new()), api_key)
    }

    /// Validates the raw query parameters, then fetches the route.
    pub async fn fetch_for_query(
        &self,
        query: &DirectionsQuery,
    ) -> Result<WalkingRoute, DirectionsError> {
        let (origin, destination) = query.validate()?;
        self.fetch_walking_route(origin, destination).await
    }

    pub async fn fetch_walking_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<WalkingRoute, DirectionsError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or(DirectionsError::MissingConfiguration)?;

        let request = ProviderRequest {
            origin,
            destination,
            mode: MODE,
            api_key,
        };
        log::debug!("Requesting walking directions {} -> {}.", origin, destination);

        let response = self.transport.send(&request).await.map_err(|why| {
            log::error!(
                "Directions request {} -> {} failed: {}",
                origin,
                destination,
                why
            );
            DirectionsError::Transport
        })?;

        interpret(response)
    }
}

fn interpret(response: DirectionsResponse) -> Result<WalkingRoute, DirectionsError> {
    match response.status.as_str() {
        "OK" => Ok(response
            .routes
            .into_iter()
            .next()
            .map(|route| WalkingRoute {
                polyline: route.overview_polyline.map(|polyline| polyline.points),
                steps: route
                    .legs
                    .into_iter()
                    .next()
                    .map(|leg| {
                        leg.steps
                            .into_iter()
                            .map(|step| RouteStep {
                                instruction: sanitize::instruction_text(
                                    &step.html_instructions,
                                ),
                                distance: step.distance.map(|d| d.text).unwrap_or_default(),
                                duration: step.duration.map(|d| d.text).unwrap_or_default(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .unwrap_or_else(WalkingRoute::no_route)),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(WalkingRoute::no_route()),
        status => {
            let message = response
                .error_message
                .unwrap_or_else(|| format!("Directions provider answered {}", status));
            log::warn!("Directions provider answered {}: {}", status, message);
            Err(DirectionsError::Provider {
                status: status.to_owned(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;

    struct MockTransport {
        calls: AtomicUsize,
        requests: Mutex<Vec<ProviderRequest>>,
        answer: Result<&'static str, TransportError>,
    }

    impl MockTransport {
        fn answering(body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(vec![]),
                answer: Ok(body),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(vec![]),
                answer: Err(TransportError::InvalidResponse {
                    status_code: reqwest::StatusCode::BAD_GATEWAY,
                    response: Some("upstream exploded at 10.0.0.7".to_owned()),
                }),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DirectionsTransport for MockTransport {
        async fn send(
            &self,
            request: &ProviderRequest,
        ) -> Result<DirectionsResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            match &self.answer {
                Ok(body) => Ok(serde_json::from_str(body)?),
                Err(e) => Err(e.clone()),
            }
        }
    }

    const OK_BODY: &str = r#"{
        "status": "OK",
        "routes": [{
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"},
            "legs": [{
                "steps": [
                    {
                        "html_instructions": "Head <b>north</b> on <b>Cemetery Rd</b>",
                        "distance": {"text": "40 m", "value": 40},
                        "duration": {"text": "1 min", "value": 30}
                    },
                    {
                        "html_instructions": "Turn <b>left</b><div style=\"font-size:0.9em\">Destination will be on the right</div>",
                        "distance": {"text": "12 m", "value": 12},
                        "duration": {"text": "1 min", "value": 9}
                    }
                ]
            }]
        }]
    }"#;

    fn gate() -> Coordinate {
        Coordinate::new(54.001, -8.964).unwrap()
    }

    fn grave() -> Coordinate {
        Coordinate::new(54.00408, -8.96447).unwrap()
    }

    fn gateway(transport: Arc<MockTransport>) -> DirectionsGateway {
        DirectionsGateway::new(transport, Some("test-key".to_owned()))
    }

    fn full_query() -> DirectionsQuery {
        DirectionsQuery {
            start_lat: Some("54.001".to_owned()),
            start_lng: Some("-8.964".to_owned()),
            end_lat: Some("54.00408".to_owned()),
            end_lng: Some("-8.96447".to_owned()),
        }
    }

    #[tokio::test]
    async fn successful_route_carries_polyline_and_plain_steps() {
        let transport = MockTransport::answering(OK_BODY);
        let route = gateway(transport.clone())
            .fetch_walking_route(gate(), grave())
            .await
            .unwrap();

        assert_eq!(route.polyline.as_deref(), Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@"));
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].instruction, "Head north on Cemetery Rd");
        assert_eq!(
            route.steps[1].instruction,
            "Turn left Destination will be on the right"
        );
        assert_eq!(route.steps[0].distance, "40 m");
        assert_eq!(route.steps[1].duration, "1 min");
        assert_eq!(transport.calls(), 1);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].mode, "walking");
        assert_eq!(requests[0].origin, gate());
        assert_eq!(requests[0].destination, grave());
        assert_eq!(requests[0].api_key, "test-key");
    }

    #[tokio::test]
    async fn missing_parameter_never_reaches_the_network() {
        let transport = MockTransport::answering(OK_BODY);
        let gateway = gateway(transport.clone());

        for strip in 0..4 {
            let mut query = full_query();
            match strip {
                0 => query.start_lat = None,
                1 => query.start_lng = None,
                2 => query.end_lat = None,
                _ => query.end_lng = None,
            }
            let result = gateway.fetch_for_query(&query).await;
            assert!(matches!(result, Err(DirectionsError::Input(_))));
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn malformed_parameter_never_reaches_the_network() {
        let transport = MockTransport::answering(OK_BODY);
        let mut query = full_query();
        query.end_lng = Some("west".to_owned());
        let result = gateway(transport.clone()).fetch_for_query(&query).await;
        assert_eq!(result.unwrap_err().kind(), "missing-parameters");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_is_a_configuration_error() {
        let transport = MockTransport::answering(OK_BODY);
        let gateway = DirectionsGateway::new(transport.clone(), None);
        let result = gateway.fetch_for_query(&full_query()).await;
        assert_eq!(result, Err(DirectionsError::MissingConfiguration));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn zero_results_is_a_successful_empty_route() {
        let transport = MockTransport::answering(r#"{"status": "ZERO_RESULTS", "routes": []}"#);
        let route = gateway(transport)
            .fetch_walking_route(gate(), grave())
            .await
            .unwrap();
        assert!(!route.has_route());
        assert!(route.steps.is_empty());
    }

    #[tokio::test]
    async fn ok_without_routes_is_a_successful_empty_route() {
        let transport = MockTransport::answering(r#"{"status": "OK", "routes": []}"#);
        let route = gateway(transport)
            .fetch_walking_route(gate(), grave())
            .await
            .unwrap();
        assert_eq!(route, WalkingRoute::no_route());
    }

    #[tokio::test]
    async fn provider_status_is_surfaced_with_its_message() {
        let transport = MockTransport::answering(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "routes": []}"#,
        );
        let error = gateway(transport)
            .fetch_walking_route(gate(), grave())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), "provider-error");
        assert_eq!(error.to_string(), "The provided API key is invalid.");
    }

    #[tokio::test]
    async fn transport_failures_hide_their_details() {
        let transport = MockTransport::failing();
        let error = gateway(transport.clone())
            .fetch_walking_route(gate(), grave())
            .await
            .unwrap_err();
        assert_eq!(error, DirectionsError::Transport);
        assert_eq!(error.to_string(), "Error fetching directions");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_a_transport_error() {
        let transport = MockTransport::answering(r#"{"routes": "nope"}"#);
        let error = gateway(transport)
            .fetch_walking_route(gate(), grave())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), "transport-error");
    }

    #[tokio::test]
    async fn identical_calls_are_not_cached() {
        let transport = MockTransport::answering(OK_BODY);
        let gateway = gateway(transport.clone());
        let first = gateway.fetch_walking_route(gate(), grave()).await.unwrap();
        let second = gateway.fetch_walking_route(gate(), grave()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(transport.calls(), 2);
    }
}
