use std::fmt;

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Serialize, Serializer};
use utility::{
    id::{HasId, Id},
    slug::person_slug,
};

use crate::{coordinate::Coordinate, ExampleData};

pub const UNKNOWN: &str = "unknown";

/// A burial record of the roster. Only built through [`Person::new`], which
/// keeps the slug in step with name and id.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    id: Id<Person>,
    slug: String,
    pub name: String,
    pub nickname: Option<String>,
    pub image: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub google_map_url: Option<String>,
    pub town: Option<String>,
    pub dob: Option<NaiveDate>,
    pub deathdate: Option<NaiveDate>,
    /// Age as written on the headstone, if it was transcribed.
    pub recorded_age: Option<u32>,
    pub note: Option<String>,
}

impl HasId for Person {
    type IdType = String;
}

impl Person {
    /// Creates a record without metadata. The slug is derived here, once.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        Self {
            slug: person_slug(&name, &id),
            id: Id::new(id),
            name,
            nickname: None,
            image: None,
            coordinate: None,
            google_map_url: None,
            town: None,
            dob: None,
            deathdate: None,
            recorded_age: None,
            note: None,
        }
    }

    pub fn id(&self) -> &Id<Person> {
        &self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn has_location(&self) -> bool {
        self.coordinate.is_some()
    }

    pub fn age(&self) -> Age {
        age(self.dob, self.deathdate)
    }
}

impl ExampleData for Person {
    fn example_data() -> Self {
        let mut person = Person::new("7", "may tuffy");
        person.coordinate = Coordinate::new(54.00429, -8.96394).ok();
        person.google_map_url =
            Some("http://maps.google.com/maps?q=54.00429%2C-8.96394".to_owned());
        person.town = Some("Doonmaynor".to_owned());
        person.deathdate = NaiveDate::from_ymd_opt(1984, 5, 7);
        person.recorded_age = Some(61);
        person.note = Some("wife of thomas".to_owned());
        person
    }
}

/// Age at death in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Age {
    Years(i32),
    Unknown,
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Age::Years(years) => write!(f, "{}", years),
            Age::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl Serialize for Age {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Age::Years(years) => serializer.serialize_i32(*years),
            Age::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// Calendar-year difference between birth and death, one less if the
/// birthday had not come round yet in the year of death.
pub fn age(dob: Option<NaiveDate>, deathdate: Option<NaiveDate>) -> Age {
    match (dob, deathdate) {
        (Some(birth), Some(death)) => {
            let mut years = death.year() - birth.year();
            if (death.month(), death.day()) < (birth.month(), birth.day()) {
                years -= 1;
            }
            Age::Years(years)
        }
        _ => Age::Unknown,
    }
}

/// Long month-name form, e.g. `June 1, 1993`.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => UNKNOWN.to_owned(),
    }
}

/// Reads a date as stored in the roster: ISO `YYYY-MM-DD` (optionally
/// followed by a time) or the day-first `DD/MM/YYYY` of the transcriptions.
///
/// Slashed dates are always read day-first, so `06/01/1993` is 6 January.
/// This departs on purpose from a browser's `Date` parsing, which reads the
/// same text month-first as 1 June. The transcriptions write the day first,
/// and `22/01/1995` would be no date at all month-first.
pub fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Some((date, _time)) = text.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(text, "%d/%m/%Y").ok()
}
