use std::cmp::Ordering;

use crate::items::SearchableItem;

use super::fuzzy::{CompiledPattern, FuzzyMatcher, Pattern, words};

/// Lowercased words of the searchable fields of one item.
#[derive(Debug, Clone)]
struct IndexedFields {
    title: Vec<String>,
    description: Vec<String>,
    body: Vec<String>,
}

impl IndexedFields {
    fn new(item: &SearchableItem) -> Self {
        Self {
            title: words(&item.title),
            description: words(&item.description),
            body: words(&item.body_text),
        }
    }

    fn best_score(&self, matcher: &FuzzyMatcher, pattern: &CompiledPattern) -> Option<f64> {
        [&self.title, &self.description, &self.body]
            .into_iter()
            .filter_map(|field| matcher.score(pattern, field))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }
}

/// A search result; `score` is `None` when the query was blank and nothing was ranked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub item: &'a SearchableItem,
    pub score: Option<f64>,
}

/// Fuzzy index over item titles, descriptions and body text.
///
/// Built once from the full item list and never updated afterwards.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    items: Vec<SearchableItem>,
    fields: Vec<IndexedFields>,
    matcher: FuzzyMatcher,
}

impl SearchIndex {
    #[must_use]
    pub fn build(items: Vec<SearchableItem>) -> Self {
        Self::with_matcher(items, FuzzyMatcher::default())
    }

    #[must_use]
    pub fn with_matcher(items: Vec<SearchableItem>, matcher: FuzzyMatcher) -> Self {
        let fields = items.iter().map(IndexedFields::new).collect();
        Self {
            items,
            fields,
            matcher,
        }
    }

    /// All indexed items in aggregation order.
    #[must_use]
    pub fn items(&self) -> &[SearchableItem] {
        &self.items
    }

    /// Matches for `query`, best first; equal scores keep aggregation order.
    ///
    /// A blank query skips matching and yields every item unranked.
    #[must_use]
    pub fn search(&self, query: &str) -> Hits<'_> {
        let Some(pattern) = Pattern::parse(query) else {
            return Hits {
                index: self,
                order: (0..self.items.len()).map(|i| (i, None)).collect::<Vec<_>>().into_iter(),
            };
        };

        let pattern = self.matcher.compile(&pattern);
        let mut ranked: Vec<(usize, Option<f64>)> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(i, fields)| {
                fields
                    .best_score(&self.matcher, &pattern)
                    .map(|score| (i, Some(score)))
            })
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        Hits {
            index: self,
            order: ranked.into_iter(),
        }
    }
}

/// Iterator over search hits, resolved against the index on demand.
#[derive(Debug)]
pub struct Hits<'a> {
    index: &'a SearchIndex,
    order: std::vec::IntoIter<(usize, Option<f64>)>,
}

impl<'a> Iterator for Hits<'a> {
    type Item = SearchHit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.order.next().map(|(i, score)| SearchHit {
            item: &self.index.items[i],
            score,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl ExactSizeIterator for Hits<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemKind, SearchableItem};

    fn item(id: &str, title: &str, description: &str, body: &str) -> SearchableItem {
        SearchableItem {
            id: id.into(),
            kind: ItemKind::Lesson,
            title: title.into(),
            description: description.into(),
            difficulty: None,
            category: "General".into(),
            tags: Vec::new(),
            created_at: None,
            duration_minutes: None,
            url: format!("lesson.html?id={id}"),
            body_text: body.into(),
            context: None,
        }
    }

    fn sample() -> SearchIndex {
        SearchIndex::build(vec![
            item("bread", "Sourdough Starter", "Wild yeast", "Feed it flour"),
            item("py", "Python Basics", "Variables and loops", "print hello"),
            item("pyx", "Advanced Topics", "Generators in python", "yield"),
        ])
    }

    #[test]
    fn misspelled_query_finds_python_basics() {
        let index = sample();
        let ids: Vec<&str> = index.search("pythn").map(|hit| hit.item.id.as_str()).collect();
        assert!(ids.contains(&"py"));
        assert!(!ids.contains(&"bread"));
    }

    #[test]
    fn exact_match_ranks_first_and_ties_keep_order() {
        let index = sample();
        let hits: Vec<SearchHit<'_>> = index.search("python").collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item.id, "py");
        assert_eq!(hits[1].item.id, "pyx");
        assert_eq!(hits[0].score, Some(0.0));
    }

    #[test]
    fn better_match_outranks_earlier_item() {
        let index = SearchIndex::build(vec![
            item("a", "Pythn notes", "", ""),
            item("b", "Python", "", ""),
        ]);
        let ids: Vec<&str> = index.search("python").map(|hit| hit.item.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn blank_query_returns_everything_unranked() {
        let index = sample();
        let hits: Vec<SearchHit<'_>> = index.search("   ").collect();
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|hit| hit.score.is_none()));
        let ids: Vec<&str> = hits.iter().map(|hit| hit.item.id.as_str()).collect();
        assert_eq!(ids, vec!["bread", "py", "pyx"]);
    }

    #[test]
    fn short_word_does_not_match_a_lookalike_deep_in_the_body() {
        let filler = "Mix flour and water, then cover the bowl. ".repeat(4);
        let index = SearchIndex::build(vec![
            item("rust", "Rust Ownership", "Moves and borrows", ""),
            item(
                "bread",
                "Sourdough Starter",
                "Wild yeast",
                &format!("{filler}Let the dough rest for just ten minutes."),
            ),
        ]);
        let hits: Vec<(&str, Option<f64>)> = index
            .search("rust")
            .map(|hit| (hit.item.id.as_str(), hit.score))
            .collect();
        assert_eq!(hits, vec![("rust", Some(0.0))]);
    }

    #[test]
    fn searches_body_text() {
        let index = sample();
        let ids: Vec<&str> = index.search("flour").map(|hit| hit.item.id.as_str()).collect();
        assert_eq!(ids, vec!["bread"]);
    }
}
