// Merge note matches and query history into one ordered suggestion list

use std::collections::HashSet;

use super::Suggestion;
use super::slug::slugify;

/// Insertion-ordered list deduplicated by comparison key, first occurrence wins
#[derive(Debug, Default)]
struct KeyedList {
    entries: Vec<(String, String)>,
    keys: HashSet<String>,
}

impl KeyedList {
    fn from_texts<I>(texts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut list = Self::default();
        for text in texts {
            let text = text.into();
            let key = comparison_key(&text);
            if list.keys.insert(key.clone()) {
                list.entries.push((key, text));
            }
        }
        list
    }

    fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn remove(&mut self, key: &str) {
        if self.keys.remove(key) {
            self.entries.retain(|(k, _)| k != key);
        }
    }

    fn remove_all_in(&mut self, other: &KeyedList) {
        self.entries.retain(|(k, _)| !other.contains(k));
        self.keys.retain(|k| !other.contains(k));
    }

    fn into_texts(self) -> impl Iterator<Item = String> {
        self.entries.into_iter().map(|(_, text)| text)
    }
}

/// Slug, or the lowercased text itself when nothing slug-safe is left
fn comparison_key(text: &str) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        text.trim().to_lowercase()
    } else {
        slug
    }
}

/// Build the suggestion list for `query`
///
/// `results` are note titles and `history` past queries, each in the
/// precedence order the store returned. Output is, in this order:
///
/// 1. `Search(query)` when the query is not blank and no result shares its key
/// 2. one `Entry` per result, deduplicated by key
/// 3. one `Search` per history query, minus keys already covered by results
///    or by the query itself
pub fn collate<R, H>(query: &str, results: R, history: H) -> Vec<Suggestion>
where
    R: IntoIterator,
    R::Item: Into<String>,
    H: IntoIterator,
    H::Item: Into<String>,
{
    let query_key = comparison_key(query);
    let results = KeyedList::from_texts(results);
    let mut history = KeyedList::from_texts(history);

    history.remove_all_in(&results);
    history.remove(&query_key);

    let mut suggestions = Vec::with_capacity(results.entries.len() + history.entries.len() + 1);

    if !query.trim().is_empty() && !results.contains(&query_key) {
        suggestions.push(Suggestion::Search(query.to_string()));
    }

    suggestions.extend(results.into_texts().map(Suggestion::Entry));
    suggestions.extend(history.into_texts().map(Suggestion::Search));

    suggestions
}
