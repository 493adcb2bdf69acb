use async_trait::async_trait;
use model::person::Person;

use crate::{ingest_all, ContentError, RawGrave, RosterSource};

const GRAVES_JSON: &str = include_str!("../data/graves.json");

/// The transcribed roster shipped with the binary, for running without a
/// content store.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedRoster;

impl EmbeddedRoster {
    pub fn people() -> Result<Vec<Person>, ContentError> {
        let raws: Vec<RawGrave> = serde_json::from_str(GRAVES_JSON)?;
        Ok(ingest_all(raws))
    }
}

#[async_trait]
impl RosterSource for EmbeddedRoster {
    fn describe(&self) -> String {
        "embedded roster".to_owned()
    }

    async fn fetch_roster(&self) -> Result<Vec<Person>, ContentError> {
        Self::people()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedded_roster_loads_every_record() {
        let people = EmbeddedRoster.fetch_roster().await.unwrap();
        assert_eq!(people.len(), 9);
        assert_eq!(people[0].slug(), "tommie-cook-1");
        assert_eq!(people[5].slug(), "mary-carrabeg-6");
        assert!(people.iter().all(|person| person.has_location()));
    }

    #[test]
    fn transcribed_dates_are_day_first() {
        let people = EmbeddedRoster::people().unwrap();
        let thomas = people
            .iter()
            .find(|person| person.slug() == "thomas-tuffy-8")
            .unwrap();
        assert_eq!(
            thomas.deathdate,
            chrono::NaiveDate::from_ymd_opt(1995, 1, 22)
        );
        assert_eq!(thomas.recorded_age, Some(77));
    }
}
