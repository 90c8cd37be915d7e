//! Session-scoped state for the catalog listing page.

use crate::filter::{CategoryFilter, DifficultyFilter, Facets, FilterSelection, SortOrder};
use crate::items::SearchableItem;
use crate::model::TagName;
use crate::search::SearchIndex;

/// Items, their index, the filter options and the user's current selection.
///
/// Every input event re-runs the whole pipeline through [`BrowseSession::run`].
#[derive(Debug, Clone)]
pub struct BrowseSession {
    index: SearchIndex,
    facets: Facets,
    selection: FilterSelection,
}

impl BrowseSession {
    #[must_use]
    pub fn new(items: Vec<SearchableItem>) -> Self {
        let facets = Facets::from_items(&items);
        Self {
            index: SearchIndex::build(items),
            facets,
            selection: FilterSelection::default(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[SearchableItem] {
        self.index.items()
    }

    #[must_use]
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    #[must_use]
    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    #[must_use]
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.selection.category = category;
    }

    pub fn set_difficulty(&mut self, difficulty: DifficultyFilter) {
        self.selection.difficulty = difficulty;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.selection.sort = sort;
    }

    /// Returns whether the tag is active after the toggle.
    pub fn toggle_tag(&mut self, tag: TagName) -> bool {
        self.selection.tags.toggle(tag)
    }

    /// Candidates from the index (all items for a blank query), filtered and sorted.
    #[must_use]
    pub fn run(&self, query: &str) -> ResultSet<'_> {
        let candidates = self.index.search(query).map(|hit| hit.item);
        ResultSet {
            items: self.selection.apply(candidates),
        }
    }
}

/// Final ordered results of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<'a> {
    items: Vec<&'a SearchableItem>,
}

impl<'a> ResultSet<'a> {
    #[must_use]
    pub fn items(&self) -> &[&'a SearchableItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `"1 result"` / `"N results"`.
    #[must_use]
    pub fn count_label(&self) -> String {
        let n = self.items.len();
        format!("{n} result{}", if n == 1 { "" } else { "s" })
    }
}
