use model::{
    coordinate::Coordinate,
    map::{MapView, MarkerIcon},
    person::{format_date, Age, Person},
};
use serde::Serialize;

use crate::Roster;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub with_map: bool,
}

/// The search page: one component, configured with the map and marker icon
/// it should hand out.
#[derive(Debug, Clone)]
pub struct SearchComponent {
    map: MapView,
    icon: MarkerIcon,
}

/// A record prepared for a result card or a marker popup.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonCard {
    pub slug: String,
    pub name: String,
    pub town: Option<String>,
    pub date_of_birth: String,
    pub date_of_death: String,
    pub age: Age,
    pub google_map_url: Option<String>,
    pub note: Option<String>,
}

impl From<&Person> for PersonCard {
    fn from(person: &Person) -> Self {
        Self {
            slug: person.slug().to_owned(),
            name: person.name.clone(),
            town: person.town.clone(),
            date_of_birth: format_date(person.dob),
            date_of_death: format_date(person.deathdate),
            age: person.age(),
            google_map_url: person.google_map_url.clone(),
            note: person.note.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub position: Coordinate,
    pub popup: PersonCard,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayer {
    pub view: MapView,
    pub icon: MarkerIcon,
    pub markers: Vec<Marker>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub query: String,
    /// Matches of the query; empty while no query is entered.
    pub results: Vec<PersonCard>,
    pub map: Option<MapLayer>,
}

impl SearchComponent {
    pub fn new(map: MapView, icon: MarkerIcon) -> Self {
        Self { map, icon }
    }

    /// Runs the query against the roster. Without a query nothing is
    /// highlighted and the map shows every located grave; with one, the map
    /// shows the located matches.
    pub fn render(&self, roster: &Roster, query: &str, options: SearchOptions) -> SearchView {
        let highlighted = if query.is_empty() {
            vec![]
        } else {
            roster.search(query)
        };

        let map = options.with_map.then(|| {
            let shown: Vec<&Person> = if highlighted.is_empty() {
                roster.all().collect()
            } else {
                highlighted.clone()
            };
            MapLayer {
                view: self.map.clone(),
                icon: self.icon.clone(),
                markers: shown
                    .into_iter()
                    .filter_map(|person| {
                        person.coordinate.map(|position| Marker {
                            position,
                            popup: PersonCard::from(person),
                        })
                    })
                    .collect(),
            }
        });

        SearchView {
            query: query.to_owned(),
            results: highlighted.into_iter().map(PersonCard::from).collect(),
            map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_roster;

    fn component() -> SearchComponent {
        SearchComponent::new(MapView::cemetery(), MarkerIcon::tombstone())
    }

    fn slugs(cards: &[PersonCard]) -> Vec<&str> {
        cards.iter().map(|card| card.slug.as_str()).collect()
    }

    #[test]
    fn blank_query_highlights_nothing_but_maps_every_located_grave() {
        let roster = sample_roster();
        let view = component().render(&roster, "", SearchOptions { with_map: true });
        assert!(view.results.is_empty());
        let markers = view.map.unwrap().markers;
        // one record has no coordinate
        assert_eq!(markers.len(), roster.len() - 1);
    }

    #[test]
    fn query_maps_only_located_matches() {
        let roster = sample_roster();
        let view = component().render(&roster, "o", SearchOptions { with_map: true });
        assert_eq!(
            slugs(&view.results),
            vec![
                "tommie-cook-1",
                "bae-cook-2",
                "philip-howley-3",
                "eamon-doherty-4",
                "cooksey-martin-5"
            ]
        );
        let markers = view.map.unwrap().markers;
        assert_eq!(markers.len(), 4);
        assert!(markers.iter().all(|marker| marker.popup.slug != "eamon-doherty-4"));
    }

    #[test]
    fn map_is_left_out_unless_requested() {
        let roster = sample_roster();
        let view = component().render(&roster, "cook", SearchOptions::default());
        assert!(view.map.is_none());
        assert_eq!(view.results.len(), 3);
    }

    #[test]
    fn cards_format_missing_dates_as_unknown() {
        let roster = sample_roster();
        let view = component().render(&roster, "bae", SearchOptions::default());
        let card = &view.results[0];
        assert_eq!(card.date_of_birth, "unknown");
        assert_eq!(card.age, Age::Unknown);
    }
}
