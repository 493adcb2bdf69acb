use axum::{routing::on, Router};

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    middleware::base_url::base_url_middleware,
    WebState,
};

mod directions;
mod people;
mod search;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .nest_service("/directions", directions::routes(state.clone()))
        .nest_service("/people", people::routes(state.clone()))
        .nest_service("/search", search::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
