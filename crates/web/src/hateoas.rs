use std::{collections::HashMap, sync::Arc};

use axum::Json;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::base_url::BaseUrl;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// A payload together with links to related resources.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    #[serde(flatten)]
    pub content: T,
    /// Timings and counters; left out when empty.
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub debug_info: HashMap<String, Value>,
    pub links: Vec<Link>,
}

impl<T> Response<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            debug_info: HashMap::new(),
            links: vec![],
        }
    }

    pub fn builder(content: T, base_url: Arc<BaseUrl>) -> ResponseBuilder<T> {
        ResponseBuilder {
            response: Response::new(content),
            base_url,
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

/// Collects links relative to the request's [`BaseUrl`].
pub struct ResponseBuilder<T> {
    response: Response<T>,
    base_url: Arc<BaseUrl>,
}

impl<T> ResponseBuilder<T> {
    /// Values that fail to serialize are left out.
    pub fn debug_info(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.response.debug_info.insert(key.into(), value);
        }
        self
    }

    fn push(mut self, link: Link) -> Self {
        self.response.links.push(link);
        self
    }

    pub fn link(self, rel: impl Into<String>, path: impl AsRef<str>) -> Self {
        let href = self.base_url.url(path);
        self.push(Link::new(rel, href))
    }

    pub fn link_option(self, rel: impl Into<String>, path: Option<impl AsRef<str>>) -> Self {
        match path {
            Some(path) => self.link(rel, path),
            None => self,
        }
    }

    /// Link to `path` with `params` as its encoded query string.
    pub fn link_query<P: Serialize>(
        self,
        rel: impl Into<String>,
        path: impl AsRef<str>,
        params: &P,
    ) -> Self {
        let href = self.base_url.url_with_query(path, params);
        self.push(Link::new(rel, href))
    }

    /// Link to another site, taken as is.
    pub fn link_extern_option(self, rel: impl Into<String>, href: Option<String>) -> Self {
        match href {
            Some(href) => self.push(Link::new(rel, href)),
            None => self,
        }
    }

    pub fn build(self) -> Response<T> {
        self.response
    }
}
