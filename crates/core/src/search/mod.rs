//! Typo-tolerant text search over catalog items.

mod fuzzy;
mod index;

pub use fuzzy::{CompiledPattern, DEFAULT_THRESHOLD, FuzzyMatcher, Pattern, allowed_edits, words};
pub use index::{Hits, SearchHit, SearchIndex};
