use std::sync::Arc;

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use serde::Serialize;

/// Where the client reached us, as seen through any reverse proxy. Links in
/// responses are built from it so they stay valid behind a path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    origin: String,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl BaseUrl {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let proto = header(headers, "x-forwarded-proto").unwrap_or("http");
        let host = header(headers, "x-forwarded-host")
            .or_else(|| header(headers, "host"))
            .unwrap_or("localhost");
        let prefix = header(headers, "x-forwarded-prefix")
            .unwrap_or("")
            .trim_end_matches('/');

        Self {
            origin: format!("{}://{}{}", proto, host, prefix),
        }
    }

    pub fn url(&self, path: impl AsRef<str>) -> String {
        format!("{}{}", self.origin, path.as_ref())
    }

    /// `path` with `params` form-encoded as its query string. Parameters that
    /// can't be encoded are dropped from the link, never spliced in raw.
    pub fn url_with_query<P: Serialize>(&self, path: impl AsRef<str>, params: &P) -> String {
        match serde_urlencoded::to_string(params) {
            Ok(query) if !query.is_empty() => format!("{}?{}", self.url(path), query),
            Ok(_) => self.url(path),
            Err(why) => {
                log::warn!("Could not encode link query for {}: {}", path.as_ref(), why);
                self.url(path)
            }
        }
    }
}

pub async fn base_url_middleware(mut req: Request, next: Next) -> impl IntoResponse {
    let base_url = BaseUrl::from_headers(req.headers());
    req.extensions_mut().insert(Arc::new(base_url));
    next.run(req).await
}
