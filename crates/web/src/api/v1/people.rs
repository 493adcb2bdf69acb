use std::{sync::Arc, time::Instant};

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode, Uri},
    routing::{get, on},
    Extension, Json, Router,
};
use model::{
    coordinate::{Coordinate, REFERENCE_POINT},
    person::{format_date, Age, Person},
    route::{RoutePath, RouteStep},
};
use roster::Roster;
use serde::{Deserialize, Serialize};

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, VecResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/people{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Person>))
        .route("/:slug", get(get_person))
        .route("/:slug/route", get(get_person_route))
        .route("/", get(get_people))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// A record with the values derived for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersonDto {
    #[serde(flatten)]
    person: Person,
    age: Age,
    date_of_birth: String,
    date_of_death: String,
}

impl From<Person> for PersonDto {
    fn from(person: Person) -> Self {
        Self {
            age: person.age(),
            date_of_birth: format_date(person.dob),
            date_of_death: format_date(person.deathdate),
            person,
        }
    }
}

/// Walking route from the gate to one grave.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersonRouteDto {
    slug: String,
    name: String,
    origin: Coordinate,
    destination: Coordinate,
    path: Option<RoutePath>,
    length_km: Option<f64>,
    steps: Vec<RouteStep>,
}

#[derive(Deserialize)]
struct PeopleQuery {
    q: Option<String>,
}

fn find_person(
    roster: &Roster,
    slug: &str,
    original_uri: &Uri,
) -> Result<Person, RouteErrorResponse> {
    roster.find_by_slug(slug).cloned().ok_or_else(|| {
        RouteErrorResponse::not_found(&Method::GET, original_uri.path())
            .with_message(format!("There is no grave '{}'.", slug))
    })
}

async fn get_people(
    State(WebState { roster, .. }): State<WebState>,
    Query(params): Query<PeopleQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> Json<hateoas::Response<VecResponse<hateoas::Response<PersonDto>>>> {
    let query = params.q.unwrap_or_default();
    let data = roster
        .search(&query)
        .into_iter()
        .map(|person| person_hateoas(person.clone(), base_url.clone()))
        .collect::<Vec<_>>();
    VecResponse::new(data).hateoas().json()
}

async fn get_person(
    OriginalUri(original_uri): OriginalUri,
    Path(slug): Path<String>,
    State(WebState { roster, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<PersonDto> {
    find_person(&roster, &slug, &original_uri)
        .map(|person| person_hateoas(person, base_url).json())
}

async fn get_person_route(
    OriginalUri(original_uri): OriginalUri,
    Path(slug): Path<String>,
    State(WebState {
        roster, directions, ..
    }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<PersonRouteDto> {
    let person = find_person(&roster, &slug, &original_uri)?;
    let destination = person.coordinate.ok_or_else(|| {
        RouteErrorResponse::new(StatusCode::UNPROCESSABLE_ENTITY)
            .with_message("Directions unavailable: no location is recorded for this grave.")
            .with_kind("missing-location")
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;

    let now = Instant::now();
    let route = directions
        .fetch_walking_route(REFERENCE_POINT, destination)
        .await
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?;
    let fetch_directions_elapsed = now.elapsed();

    let path = route.path().map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    })?;

    let dto = PersonRouteDto {
        slug: person.slug().to_owned(),
        name: person.name.clone(),
        origin: REFERENCE_POINT,
        destination,
        length_km: path.as_ref().map(RoutePath::length_km),
        path,
        steps: route.steps,
    };
    Ok(hateoas::Response::builder(dto, base_url)
        .link("self", resource!("/{}/route", person.slug()))
        .link("person", resource!("/{}", person.slug()))
        .debug_info("fetchDirectionsSecs", fetch_directions_elapsed.as_secs_f64())
        .build()
        .json())
}

pub(crate) fn person_hateoas(
    person: Person,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<PersonDto> {
    let slug = person.slug().to_owned();
    let route = person
        .has_location()
        .then(|| resource!("/{}/route", slug));
    let google_map_url = person.google_map_url.clone();
    hateoas::Response::builder(PersonDto::from(person), base_url)
        .link("self", resource!("/{}", slug))
        .link_option("route", route)
        .link_extern_option("map", google_map_url)
        .build()
}
