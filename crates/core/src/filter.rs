//! Categorical filtering and ordering of search candidates.
//!
//! Everything here is a pure function of the items and the current selection.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashSet};

use crate::error::Error;
use crate::items::SearchableItem;
use crate::model::{Difficulty, DifficultyError, TagName};

/// Choice label meaning "no restriction" in the category and difficulty selects.
pub const ALL: &str = "All";

//
// ─── CATEGORY / DIFFICULTY ─────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn from_choice(choice: &str) -> Self {
        if choice == ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(choice.to_owned())
        }
    }

    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    /// Parse a select value; `"All"` lifts the restriction.
    ///
    /// # Errors
    ///
    /// Returns `DifficultyError::Unknown` for anything but `All` or a difficulty name.
    pub fn from_choice(choice: &str) -> Result<Self, DifficultyError> {
        if choice == ALL {
            return Ok(DifficultyFilter::All);
        }
        choice.parse().map(DifficultyFilter::Only)
    }

    #[must_use]
    pub fn matches(&self, difficulty: Option<Difficulty>) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(wanted) => difficulty == Some(*wanted),
        }
    }
}

//
// ─── TAGS ──────────────────────────────────────────────────────────────────────
//

/// Set of active tag toggles. An item must carry every active tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagSelection(BTreeSet<TagName>);

impl TagSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a tag on or off; returns whether it is now active.
    pub fn toggle(&mut self, tag: TagName) -> bool {
        if self.0.remove(&tag) {
            false
        } else {
            self.0.insert(tag);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &TagName) -> bool {
        self.0.contains(tag)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagName> {
        self.0.iter()
    }

    #[must_use]
    pub fn matches(&self, item: &SearchableItem) -> bool {
        self.0.iter().all(|tag| item.has_tag(tag))
    }
}

impl FromIterator<TagName> for TagSelection {
    fn from_iter<I: IntoIterator<Item = TagName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//
// ─── SORT ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Creation date, most recent first.
    Newest,
    /// Duration, shortest first.
    Shortest,
    /// Difficulty, Beginner first.
    #[default]
    Recommended,
}

impl SortOrder {
    /// Map a select value to an order; unrecognised values mean `Recommended`.
    #[must_use]
    pub fn from_choice(choice: &str) -> Self {
        match choice {
            "newest" => SortOrder::Newest,
            "shortest" => SortOrder::Shortest,
            _ => SortOrder::Recommended,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Shortest => "shortest",
            SortOrder::Recommended => "recommended",
        }
    }

    /// Stable in-place sort. Items missing the sort key go last.
    pub fn sort(self, items: &mut [&SearchableItem]) {
        match self {
            SortOrder::Newest => {
                items.sort_by_key(|item| (item.created_at.is_none(), Reverse(item.created_at)));
            }
            SortOrder::Shortest => {
                items.sort_by_key(|item| (item.duration_minutes.is_none(), item.duration_minutes));
            }
            SortOrder::Recommended => {
                items.sort_by_key(|item| item.difficulty.map_or(u8::MAX, Difficulty::rank));
            }
        }
    }
}

//
// ─── SELECTION ─────────────────────────────────────────────────────────────────
//

/// Current state of every filter control plus the chosen sort.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub category: CategoryFilter,
    pub difficulty: DifficultyFilter,
    pub tags: TagSelection,
    pub sort: SortOrder,
}

impl FilterSelection {
    /// Selection from raw control values, as submitted by a form or command line.
    ///
    /// # Errors
    ///
    /// Returns `Error::Difficulty` for an unknown difficulty and `Error::Tag`
    /// for a blank tag.
    pub fn from_choices<T: AsRef<str>>(
        category: &str,
        difficulty: &str,
        tags: &[T],
        sort: &str,
    ) -> Result<Self, Error> {
        let tags = tags
            .iter()
            .map(|tag| TagName::new(tag.as_ref()))
            .collect::<Result<TagSelection, _>>()?;
        Ok(Self {
            category: CategoryFilter::from_choice(category),
            difficulty: DifficultyFilter::from_choice(difficulty)?,
            tags,
            sort: SortOrder::from_choice(sort),
        })
    }

    #[must_use]
    pub fn matches(&self, item: &SearchableItem) -> bool {
        self.category.matches(&item.category)
            && self.difficulty.matches(item.difficulty)
            && self.tags.matches(item)
    }

    /// Keep matching candidates, then order them.
    pub fn apply<'a, I>(&self, candidates: I) -> Vec<&'a SearchableItem>
    where
        I: IntoIterator<Item = &'a SearchableItem>,
    {
        let mut kept: Vec<&SearchableItem> = candidates
            .into_iter()
            .filter(|item| self.matches(item))
            .collect();
        self.sort.sort(&mut kept);
        kept
    }
}

//
// ─── FACETS ────────────────────────────────────────────────────────────────────
//

/// Options offered by the filter controls, derived from the loaded items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<String>,
    pub difficulties: Vec<String>,
    pub tags: Vec<TagName>,
}

impl Facets {
    /// `All` first, then distinct values in first-seen order.
    #[must_use]
    pub fn from_items(items: &[SearchableItem]) -> Self {
        let mut seen_categories = HashSet::new();
        let categories = std::iter::once(ALL.to_owned())
            .chain(
                items
                    .iter()
                    .filter(|item| seen_categories.insert(item.category.as_str()))
                    .map(|item| item.category.clone()),
            )
            .collect();

        let difficulties = std::iter::once(ALL.to_owned())
            .chain(Difficulty::ALL.iter().map(ToString::to_string))
            .collect();

        let mut seen_tags = HashSet::new();
        let tags = items
            .iter()
            .flat_map(|item| item.tags.iter())
            .filter(|tag| seen_tags.insert(*tag))
            .cloned()
            .collect();

        Self {
            categories,
            difficulties,
            tags,
        }
    }
}
