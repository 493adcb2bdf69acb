use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use directions::DirectionsQuery;
use model::route::WalkingRoute;

use crate::{
    common::{route_not_found, HateoasResult, RouteErrorResponse, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/directions{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_directions))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Walking route between two raw coordinates. Every call goes to the
/// provider.
async fn get_directions(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { directions, .. }): State<WebState>,
    Query(query): Query<DirectionsQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WalkingRoute> {
    directions
        .fetch_for_query(&query)
        .await
        .map(|route| directions_hateoas(route, &query, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

fn directions_hateoas(
    route: WalkingRoute,
    query: &DirectionsQuery,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WalkingRoute> {
    hateoas::Response::builder(route, base_url)
        .link_query("self", resource!(""), query)
        .build()
}
