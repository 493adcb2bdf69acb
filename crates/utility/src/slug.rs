/// Lowercases `text` and collapses every run of characters outside `a-z0-9`
/// into a single hyphen, without leading or trailing hyphens.
pub fn kebab_case(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Builds the URL slug of a record: first name, last name and id, each
/// kebab-cased and joined by hyphens (`"Tommie Cook"`, `1` -> `tommie-cook-1`).
/// Single-word names repeat the word, as first and last name coincide.
pub fn person_slug(name: &str, id: &str) -> String {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default();
    let last = parts.last().unwrap_or(first);

    [first, last, id]
        .iter()
        .map(|part| kebab_case(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
