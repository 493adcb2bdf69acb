use chrono::NaiveDate;
use model::{
    coordinate::Coordinate,
    person::{parse_record_date, Person},
};
use serde::Deserialize;
use serde_json::Value;
use utility::serde::lenient::string_or_number;

/// A grave as the content store delivers it. Every field is optional and may
/// be a string or a number; nothing here has been validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGrave {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub nickname: Option<String>,
    #[serde(default)]
    pub image: Option<Value>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub lng: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub googlemapurl: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub town: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub deathdate: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub dob: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub misc: Option<String>,
}

/// Sanity image fields are objects pointing at an asset; older documents
/// carry a plain URL.
fn image_reference(image: &Value) -> Option<String> {
    match image {
        Value::String(url) if !url.trim().is_empty() => Some(url.trim().to_owned()),
        Value::Object(fields) => fields
            .get("asset")
            .and_then(|asset| asset.get("_ref").or_else(|| asset.get("url")))
            .and_then(Value::as_str)
            .map(str::to_owned),
        _ => None,
    }
}

fn record_date(field: &str, value: Option<&str>, name: &str) -> Option<NaiveDate> {
    let text = value?;
    let date = parse_record_date(text);
    if date.is_none() {
        log::warn!("Ignoring unreadable {} '{}' of '{}'.", field, text, name);
    }
    date
}

fn location(raw: &RawGrave, name: &str) -> Option<Coordinate> {
    match (raw.lat.as_deref(), raw.lng.as_deref()) {
        (Some(lat), Some(lng)) => {
            let coordinate = Coordinate::parse(lat, lng);
            if coordinate.is_none() {
                log::warn!(
                    "'{}' has an unusable location ({}, {}), treating it as unknown.",
                    name,
                    lat,
                    lng
                );
            }
            coordinate
        }
        _ => None,
    }
}

/// Turns an upstream record into a `Person`. `position` is the 1-based
/// position in the upstream list and stands in for a missing id. Records
/// without a name can't be searched for and are dropped.
pub fn ingest(raw: RawGrave, position: usize) -> Option<Person> {
    let Some(name) = raw.name.clone() else {
        log::warn!("Dropping record at position {} without a name.", position);
        return None;
    };
    let id = raw.id.clone().unwrap_or_else(|| position.to_string());

    let mut person = Person::new(id, name);
    person.coordinate = location(&raw, &person.name);
    person.dob = record_date("date of birth", raw.dob.as_deref(), &person.name);
    person.deathdate = record_date("date of death", raw.deathdate.as_deref(), &person.name);
    person.recorded_age = raw.age.as_deref().and_then(|age| age.parse().ok());
    person.image = raw.image.as_ref().and_then(image_reference);
    person.nickname = raw.nickname;
    person.google_map_url = raw.googlemapurl;
    person.town = raw.town;
    person.note = raw.misc;
    Some(person)
}

pub fn ingest_all(raws: Vec<RawGrave>) -> Vec<Person> {
    raws.into_iter()
        .enumerate()
        .filter_map(|(index, raw)| ingest(raw, index + 1))
        .collect()
}
