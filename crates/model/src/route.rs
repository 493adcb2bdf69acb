use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::polyline::{self, PolylineError};

use crate::coordinate::{Coordinate, CoordinateError};

/// One turn-by-turn instruction of a walking route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    /// Plain text; provider markup is stripped before it gets here.
    pub instruction: String,
    pub distance: String,
    pub duration: String,
}

/// What the directions provider answered. A `None` polyline is a successful
/// lookup that found no route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalkingRoute {
    pub polyline: Option<String>,
    pub steps: Vec<RouteStep>,
}

impl WalkingRoute {
    pub fn no_route() -> Self {
        Self::default()
    }

    pub fn has_route(&self) -> bool {
        self.polyline.is_some()
    }

    /// Decodes the polyline, if there is one.
    pub fn path(&self) -> Result<Option<RoutePath>, RoutePathError> {
        self.polyline
            .as_deref()
            .map(RoutePath::from_polyline)
            .transpose()
    }
}

/// Ordered points of a route, origin first and destination last.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutePath {
    points: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoutePathError {
    Polyline(PolylineError),
    OutOfRange {
        index: usize,
        error: CoordinateError,
    },
}

impl error::Error for RoutePathError {}

impl fmt::Display for RoutePathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutePathError::Polyline(e) => write!(f, "malformed polyline: {}", e),
            RoutePathError::OutOfRange { index, error } => {
                write!(f, "route point {} is invalid: {}", index, error)
            }
        }
    }
}

impl From<PolylineError> for RoutePathError {
    fn from(e: PolylineError) -> Self {
        RoutePathError::Polyline(e)
    }
}

impl RoutePath {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn from_polyline(encoded: &str) -> Result<Self, RoutePathError> {
        let points = polyline::decode(encoded)?
            .into_iter()
            .enumerate()
            .map(|(index, (latitude, longitude))| {
                Coordinate::new(latitude, longitude)
                    .map_err(|error| RoutePathError::OutOfRange { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    pub fn to_polyline(&self) -> String {
        polyline::encode(
            self.points
                .iter()
                .map(|point| (point.latitude(), point.longitude())),
        )
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn origin(&self) -> Option<&Coordinate> {
        self.points.first()
    }

    pub fn destination(&self) -> Option<&Coordinate> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the great-circle distances between consecutive points.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_km_to(&pair[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_points_in_encoding_order() {
        let path = RoutePath::from_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(path.len(), 3);
        let origin = path.origin().unwrap();
        let destination = path.destination().unwrap();
        assert!((origin.latitude() - 38.5).abs() < 1e-9);
        assert!((origin.longitude() + 120.2).abs() < 1e-9);
        assert!((destination.latitude() - 43.252).abs() < 1e-9);
        assert!((destination.longitude() + 126.453).abs() < 1e-9);
    }

    #[test]
    fn re_encoding_reproduces_the_polyline() {
        let encoded = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";
        assert_eq!(RoutePath::from_polyline(encoded).unwrap().to_polyline(), encoded);
    }

    #[test]
    fn out_of_range_points_are_rejected() {
        // a single point at latitude 100
        let encoded = polyline::encode([(100.0, 0.0)]);
        assert!(matches!(
            RoutePath::from_polyline(&encoded),
            Err(RoutePathError::OutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn walking_route_without_polyline_has_no_path() {
        let route = WalkingRoute::no_route();
        assert!(!route.has_route());
        assert_eq!(route.path(), Ok(None));
    }

    #[test]
    fn length_of_a_single_point_is_zero() {
        let path = RoutePath::new(vec![Coordinate::new(54.0, -8.9).unwrap()]);
        assert_eq!(path.length_km(), 0.0);
    }
}
