use model::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

use crate::DirectionsError;

/// Raw `startLat`/`startLng`/`endLat`/`endLng` parameters as they arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_lng: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_lng: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl DirectionsQuery {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            start_lat: Some(origin.latitude().to_string()),
            start_lng: Some(origin.longitude().to_string()),
            end_lat: Some(destination.latitude().to_string()),
            end_lng: Some(destination.longitude().to_string()),
        }
    }

    /// Origin and destination, or an input error naming what is wrong.
    pub fn validate(&self) -> Result<(Coordinate, Coordinate), DirectionsError> {
        let (Some(start_lat), Some(start_lng), Some(end_lat), Some(end_lng)) = (
            present(&self.start_lat),
            present(&self.start_lng),
            present(&self.end_lat),
            present(&self.end_lng),
        ) else {
            return Err(DirectionsError::Input("Missing query parameters".to_owned()));
        };

        let origin = Coordinate::parse(start_lat, start_lng).ok_or_else(|| {
            DirectionsError::Input(format!("Invalid start coordinate {},{}", start_lat, start_lng))
        })?;
        let destination = Coordinate::parse(end_lat, end_lng).ok_or_else(|| {
            DirectionsError::Input(format!("Invalid end coordinate {},{}", end_lat, end_lng))
        })?;
        Ok((origin, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(values: [&str; 4]) -> DirectionsQuery {
        let [a, b, c, d] = values.map(|v| Some(v.to_owned()));
        DirectionsQuery {
            start_lat: a,
            start_lng: b,
            end_lat: c,
            end_lng: d,
        }
    }

    #[test]
    fn accepts_four_decimal_strings() {
        let (origin, destination) = query(["54.001", "-8.964", "54.0041", "-8.9645"])
            .validate()
            .unwrap();
        assert_eq!(origin.latitude(), 54.001);
        assert_eq!(destination.longitude(), -8.9645);
    }

    #[test]
    fn blank_counts_as_missing() {
        let error = query(["54.001", " ", "54.0041", "-8.9645"])
            .validate()
            .unwrap_err();
        assert_eq!(error, DirectionsError::Input("Missing query parameters".to_owned()));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let error = query(["54.001", "-8.964", "91", "-8.9645"]).validate().unwrap_err();
        assert_eq!(error.kind(), "missing-parameters");
        assert!(error.to_string().contains("end coordinate"));
    }

    #[test]
    fn deserializes_camel_case_names() {
        let query: DirectionsQuery =
            serde_json::from_str(r#"{"startLat": "1", "startLng": "2", "endLat": "3"}"#).unwrap();
        assert_eq!(query.end_lat.as_deref(), Some("3"));
        assert_eq!(query.end_lng, None);
    }

    #[test]
    fn new_round_trips_through_validate() {
        let origin = Coordinate::new(54.001, -8.964).unwrap();
        let destination = Coordinate::new(54.00408, -8.96447).unwrap();
        assert_eq!(
            DirectionsQuery::new(origin, destination).validate().unwrap(),
            (origin, destination)
        );
    }
}
