use schemars::JsonSchema;
use serde::Serialize;

use crate::coordinate::{Coordinate, CEMETERY_CENTER};

/// Marker image for graves on the map. Built once at startup and handed to
/// whoever renders markers.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub icon_url: String,
    pub icon_size: [i32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_url: String,
    pub shadow_size: [i32; 2],
}

impl MarkerIcon {
    pub fn tombstone() -> Self {
        Self {
            icon_url: "/images/tombstone.png".to_owned(),
            icon_size: [32, 37],
            icon_anchor: [16, 37],
            popup_anchor: [0, -37],
            shadow_url:
                "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-shadow.png"
                    .to_owned(),
            shadow_size: [41, 41],
        }
    }
}

/// Initial view of the cemetery map.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl MapView {
    pub fn cemetery() -> Self {
        Self {
            center: CEMETERY_CENTER,
            zoom: 19,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_owned(),
        }
    }
}
