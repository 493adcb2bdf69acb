pub use crate::common::RouteResult;

use std::{env, sync::Arc};

use axum::{extract::FromRef, routing::get_service, Router};
use directions::DirectionsGateway;
use model::map::{MapView, MarkerIcon};
use roster::{Roster, SearchComponent};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "./resources/www/";

#[derive(Clone, FromRef)]
pub struct WebState {
    pub roster: Arc<Roster>,
    pub directions: DirectionsGateway,
    pub search: Arc<SearchComponent>,
}

impl WebState {
    /// State with the cemetery map and the tombstone marker.
    pub fn new(roster: Roster, directions: DirectionsGateway) -> Self {
        Self {
            roster: Arc::new(roster),
            directions,
            search: Arc::new(SearchComponent::new(
                MapView::cemetery(),
                MarkerIcon::tombstone(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    pub bind_address: String,
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            static_dir: DEFAULT_STATIC_DIR.to_owned(),
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
        }
    }
}

/// The full application: the JSON API under `/api`, static files elsewhere.
pub fn app(state: WebState, static_dir: &str) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router(static_dir))
}

pub async fn start_web_server(state: WebState, config: WebConfig) -> std::io::Result<()> {
    let routes = app(state, &config.static_dir);

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("Listening on {}.", config.bind_address);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router(static_dir: &str) -> Router {
    let not_found = format!("{}/error404.html", static_dir.trim_end_matches('/'));
    Router::new().nest_service(
        "/",
        get_service(ServeDir::new(static_dir).not_found_service(ServeFile::new(not_found))),
    )
}
