use indexmap::IndexMap;
use model::person::Person;

pub mod view;

pub use view::{PersonCard, SearchComponent, SearchOptions, SearchView};

/// Returns, in roster order, every record whose lowercased name contains the
/// lowercased query. An empty query matches everything.
pub fn search<'a, I>(query: &str, people: I) -> Vec<&'a Person>
where
    I: IntoIterator<Item = &'a Person>,
{
    let query = query.to_lowercase();
    people
        .into_iter()
        .filter(|person| person.name.to_lowercase().contains(&query))
        .collect()
}

/// The burial records, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    // Index map keeps the order the records were loaded in, which is the
    // order search results and markers are presented in.
    by_slug: IndexMap<String, Person>,
}

impl Roster {
    pub fn new<I>(people: I) -> Self
    where
        I: IntoIterator<Item = Person>,
    {
        let mut by_slug = IndexMap::new();
        for person in people {
            if by_slug.contains_key(person.slug()) {
                log::warn!(
                    "Skipping record {} ({}): slug '{}' is already taken.",
                    person.id(),
                    person.name,
                    person.slug()
                );
                continue;
            }
            by_slug.insert(person.slug().to_owned(), person);
        }
        Self { by_slug }
    }

    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }

    pub fn all(&self) -> impl Iterator<Item = &Person> {
        self.by_slug.values()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Person> {
        self.by_slug.get(slug)
    }

    pub fn search(&self, query: &str) -> Vec<&Person> {
        search(query, self.all())
    }
}
