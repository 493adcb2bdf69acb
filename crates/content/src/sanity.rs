use async_trait::async_trait;
use model::person::Person;
use serde::Deserialize;

use crate::{env_var, ingest_all, ContentError, RawGrave, RosterSource};

pub const DEFAULT_API_VERSION: &str = "2021-08-31";

/// GROQ query selecting every grave document with the fields the roster uses.
pub const GRAVES_QUERY: &str = r#"*[_type == "grave"]{
  _id,
  name,
  nickname,
  image,
  lat,
  lng,
  googlemapurl,
  town,
  deathdate,
  dob,
  age,
  misc
}"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
}

impl SanityConfig {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            use_cdn: true,
        }
    }

    /// `None` unless both project and dataset are set.
    pub fn from_env() -> Option<Self> {
        let project_id =
            env_var(&["SANITY_PROJECT_ID", "NEXT_PUBLIC_SANITY_PROJECT_ID"])?;
        let dataset = env_var(&["SANITY_DATASET", "NEXT_PUBLIC_SANITY_DATASET"])?;
        let mut config = Self::new(project_id, dataset);
        if let Some(api_version) = env_var(&["SANITY_API_VERSION"]) {
            config.api_version = api_version;
        }
        if let Some(use_cdn) = env_var(&["SANITY_USE_CDN"]) {
            config.use_cdn = !matches!(use_cdn.to_lowercase().as_str(), "false" | "0" | "no");
        }
        Some(config)
    }

    pub fn query_url(&self) -> String {
        let host = if self.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        format!(
            "https://{}.{}/v{}/data/query/{}",
            self.project_id,
            host,
            self.api_version.trim_start_matches('v'),
            self.dataset
        )
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Reads the `result` of a query response as a list of graves.
pub fn parse_query_response(body: &str) -> Result<Vec<RawGrave>, ContentError> {
    let response: QueryResponse<Vec<RawGrave>> = serde_json::from_str(body)?;
    Ok(response.result)
}

/// Read-only client for the Sanity HTTP query API.
pub struct SanityClient {
    config: SanityConfig,
    client: reqwest::Client,
}

impl SanityClient {
    pub fn new(config: SanityConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn query_graves(&self) -> Result<Vec<RawGrave>, ContentError> {
        let url = self.config.query_url();
        log::debug!("Requesting graves from '{url}'.");

        let response = self
            .client
            .get(&url)
            .query(&[("query", GRAVES_QUERY)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::InvalidResponse {
                status_code: status,
                url,
                response: response.text().await.ok(),
            });
        }

        parse_query_response(&response.text().await?)
    }
}

#[async_trait]
impl RosterSource for SanityClient {
    fn describe(&self) -> String {
        format!(
            "Sanity project '{}' dataset '{}'",
            self.config.project_id, self.config.dataset
        )
    }

    async fn fetch_roster(&self) -> Result<Vec<Person>, ContentError> {
        let raws = self.query_graves().await?;
        Ok(ingest_all(raws))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdn_query_url() {
        let config = SanityConfig::new("abc123", "production");
        assert_eq!(
            config.query_url(),
            "https://abc123.apicdn.sanity.io/v2021-08-31/data/query/production"
        );
    }

    #[test]
    fn live_query_url_accepts_prefixed_version() {
        let mut config = SanityConfig::new("abc123", "staging");
        config.use_cdn = false;
        config.api_version = "v2023-01-01".to_owned();
        assert_eq!(
            config.query_url(),
            "https://abc123.api.sanity.io/v2023-01-01/data/query/staging"
        );
    }

    #[test]
    fn parses_loosely_typed_results() {
        let body = r#"{
            "ms": 4,
            "query": "*[_type == \"grave\"]",
            "result": [
                {"_id": "grave-1", "name": "philip howley", "lat": "54.00408", "lng": -8.96447, "town": "killasser"},
                {"_id": "grave-2", "name": "martin loftus", "lat": null, "lng": null}
            ]
        }"#;
        let people = ingest_all(parse_query_response(body).unwrap());
        assert_eq!(people.len(), 2);
        assert!(people[0].has_location());
        assert!(!people[1].has_location());
        assert_eq!(people[1].slug(), "martin-loftus-grave-2");
    }

    #[test]
    fn rejects_bodies_without_result() {
        assert!(matches!(
            parse_query_response(r#"{"error": "bad query"}"#),
            Err(ContentError::JsonError(_))
        ));
    }
}
