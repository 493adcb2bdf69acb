use std::{env, error, fmt, sync::Arc};

use async_trait::async_trait;
use model::person::Person;

pub mod embedded;
pub mod ingest;
pub mod sanity;

pub use embedded::EmbeddedRoster;
pub use ingest::{ingest, ingest_all, RawGrave};
pub use sanity::{SanityClient, SanityConfig};

#[derive(Debug, Clone)]
pub enum ContentError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
}

impl error::Error for ContentError {}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContentError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ContentError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ContentError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
        }
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(e: reqwest::Error) -> Self {
        ContentError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(e: serde_json::Error) -> Self {
        ContentError::JsonError(Arc::new(e))
    }
}

/// Somewhere the roster can be read from.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Short human readable description used in logs.
    fn describe(&self) -> String;

    async fn fetch_roster(&self) -> Result<Vec<Person>, ContentError>;
}

/// Picks the content store from the environment: Sanity when a project and
/// dataset are configured, the embedded roster otherwise.
pub fn source_from_env() -> Box<dyn RosterSource> {
    match SanityConfig::from_env() {
        Some(config) => Box::new(SanityClient::new(config)),
        None => {
            log::info!("No Sanity project configured, using the embedded roster.");
            Box::new(EmbeddedRoster)
        }
    }
}

/// Reads the first of `names` that is set to a non-blank value.
pub(crate) fn env_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}
