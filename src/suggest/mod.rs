//! Search and creation suggestions
//!
//! Two sources feed a suggestion list: note titles from the index and past
//! queries from the history log. [`collate`] merges them; [`Suggester`] picks
//! which store queries run depending on whether the user has typed anything.

mod collate;
pub mod slug;

pub use collate::collate;
pub use slug::{slugify, SLUG_MAX_LEN};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SuggestError;
use crate::store::NoteStore;

/// One row in the suggestion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Suggestion {
    /// An existing note whose title or body matched
    Entry(String),
    /// Search for, or create, this literal text
    Search(String),
}

impl Suggestion {
    pub fn text(&self) -> &str {
        match self {
            Suggestion::Entry(text) | Suggestion::Search(text) => text,
        }
    }
}

/// How many rows each store query may contribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestLimits {
    /// Empty query: most recently modified titles
    pub recent_titles: usize,
    /// Empty query: most recently submitted queries
    pub recent_history: usize,
    /// Typed query: best-ranked matching titles
    pub ranked_titles: usize,
    /// Typed query: history entries starting with the query
    pub history_matches: usize,
}

impl Default for SuggestLimits {
    fn default() -> Self {
        Self {
            recent_titles: 5,
            recent_history: 5,
            ranked_titles: 5,
            history_matches: 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Suggester {
    limits: SuggestLimits,
}

impl Suggester {
    pub fn new(limits: SuggestLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SuggestLimits {
        &self.limits
    }

    /// Suggestions for the text currently typed
    ///
    /// Read-only against the store. Any store failure fails the whole call;
    /// there are no partial lists.
    pub fn suggest<S>(&self, query: &str, store: &S) -> Result<Vec<Suggestion>, SuggestError>
    where
        S: NoteStore + ?Sized,
    {
        let trimmed = query.trim();

        let (results, history) = if trimmed.is_empty() {
            (
                store.recent_titles(self.limits.recent_titles)?,
                store.recent_history(self.limits.recent_history)?,
            )
        } else {
            (
                store.search_titles_ranked(trimmed, self.limits.ranked_titles)?,
                store.search_history_by_prefix(trimmed, self.limits.history_matches)?,
            )
        };

        debug!(
            "Collating {} titles and {} history queries",
            results.len(),
            history.len()
        );

        Ok(collate(query, results, history))
    }

    /// Log a submitted query with its current hit count
    ///
    /// Blank queries are not logged and return `None`.
    pub fn submit<S>(&self, query: &str, store: &S) -> Result<Option<usize>, SuggestError>
    where
        S: NoteStore + ?Sized,
    {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let hit_count = store.count_matches(trimmed)?;
        store.append_history(trimmed, hit_count)?;

        debug!("Logged query with {} hits", hit_count);
        Ok(Some(hit_count))
    }
}
