use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, on},
    Extension, Json, Router,
};
use roster::{SearchOptions, SearchView};
use serde::{Deserialize, Serialize};

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

use super::people;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/search{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_search))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    #[serde(default)]
    map: bool,
}

/// The search page in one response: highlighted records and, on request,
/// the map with its markers.
async fn get_search(
    State(WebState { roster, search, .. }): State<WebState>,
    Query(params): Query<SearchQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> Json<hateoas::Response<SearchView>> {
    let options = SearchOptions {
        with_map: params.map,
    };
    let view = search.render(&roster, &params.q, options);
    log::debug!(
        "Search {:?} highlighted {} of {} graves.",
        params.q,
        view.results.len(),
        roster.len()
    );

    let response = hateoas::Response::builder(view, base_url)
        .link_query("self", resource!(""), &params)
        .debug_info("rosterSize", roster.len());
    let response = if params.q.is_empty() {
        response
    } else {
        response.link_query("people", people::resource!(""), &[("q", &params.q)])
    };
    response.build().json()
}
