use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

/// The fixed origin of every walking route: the cemetery gate.
pub const REFERENCE_POINT: Coordinate = Coordinate {
    latitude: 54.001,
    longitude: -8.964,
};

/// Initial centre of the cemetery map.
pub const CEMETERY_CENTER: Coordinate = Coordinate {
    latitude: 54.00355045322079,
    longitude: -8.964299261569979,
};

/// A position in decimal degrees. Latitude is always within [-90, 90] and
/// longitude within [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", try_from = "UncheckedCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    Latitude(f64),
    Longitude(f64),
}

impl error::Error for CoordinateError {}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoordinateError::Latitude(value) => {
                write!(f, "latitude {} is outside of [-90, 90]", value)
            }
            CoordinateError::Longitude(value) => {
                write!(f, "longitude {} is outside of [-180, 180]", value)
            }
        }
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !geo::is_valid_latitude(latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !geo::is_valid_longitude(longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parses a pair of decimal-degree strings. Anything unparsable or out of
    /// range yields `None`, i.e. "no location".
    pub fn parse(latitude: &str, longitude: &str) -> Option<Self> {
        let latitude = geo::parse_degrees(latitude)?;
        let longitude = geo::parse_degrees(longitude)?;
        Self::new(latitude, longitude).ok()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn distance_km_to(&self, other: &Coordinate) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct UncheckedCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<UncheckedCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: UncheckedCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(value.latitude, value.longitude)
    }
}
