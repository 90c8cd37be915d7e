use std::fmt;
use std::sync::Arc;

use levenshtein_automata::{DFA, Distance, LevenshteinAutomatonBuilder};

/// Score cut-off: 0.0 accepts exact matches only, 1.0 accepts anything.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Edits tolerated for a query word of `len` characters.
///
/// Short words must match exactly so that "rust" never matches "just".
#[must_use]
pub fn allowed_edits(len: usize) -> u8 {
    match len {
        0..=4 => 0,
        5..=7 => 1,
        _ => 2,
    }
}

/// Lowercased alphanumeric words of `text`.
#[must_use]
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// A non-blank query split into lowercased words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<String>,
}

impl Pattern {
    /// Returns `None` for a blank query.
    #[must_use]
    pub fn parse(query: &str) -> Option<Self> {
        if query.trim().is_empty() {
            return None;
        }
        Some(Self {
            tokens: words(query),
        })
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

struct CompiledToken {
    text: String,
    len: usize,
    /// `None` when the word must match exactly.
    dfa: Option<DFA>,
}

impl CompiledToken {
    /// Edits needed to turn the token into a prefix of `word`, within the allowed bound.
    fn distance(&self, word: &str) -> Option<u8> {
        match &self.dfa {
            None => word.starts_with(&self.text).then_some(0),
            Some(dfa) => match dfa.eval(word) {
                Distance::Exact(edits) => Some(edits),
                Distance::AtLeast(_) => None,
            },
        }
    }
}

/// A pattern with one Levenshtein automaton per word, built once per search.
pub struct CompiledPattern {
    tokens: Vec<CompiledToken>,
}

/// Word-level fuzzy matcher.
///
/// Every query word must match the start of some word in the field, within
/// [`allowed_edits`] (transpositions count as one edit). A word scores its edits
/// divided by its length; the field scores the mean over the query words.
#[derive(Clone)]
pub struct FuzzyMatcher {
    threshold: f64,
    /// Builders for one and two edits.
    builders: Arc<[LevenshteinAutomatonBuilder; 2]>,
}

impl fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyMatcher")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FuzzyMatcher {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            builders: Arc::new([
                LevenshteinAutomatonBuilder::new(1, true),
                LevenshteinAutomatonBuilder::new(2, true),
            ]),
        }
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn compile(&self, pattern: &Pattern) -> CompiledPattern {
        let tokens = pattern
            .tokens
            .iter()
            .map(|token| {
                let len = token.chars().count();
                let dfa = match allowed_edits(len) {
                    0 => None,
                    1 => Some(self.builders[0].build_prefix_dfa(token)),
                    _ => Some(self.builders[1].build_prefix_dfa(token)),
                };
                CompiledToken {
                    text: token.clone(),
                    len,
                    dfa,
                }
            })
            .collect();
        CompiledPattern { tokens }
    }

    /// Score the words of one field; `None` when a query word is unmatched or
    /// the score exceeds the threshold.
    #[must_use]
    pub fn score(&self, pattern: &CompiledPattern, field: &[String]) -> Option<f64> {
        if pattern.tokens.is_empty() {
            return None;
        }

        let mut total = 0.0;
        for token in &pattern.tokens {
            let edits = field.iter().filter_map(|word| token.distance(word)).min()?;
            #[allow(clippy::cast_precision_loss)]
            let ratio = f64::from(edits) / token.len as f64;
            total += ratio;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = total / pattern.tokens.len() as f64;

        (mean <= self.threshold).then_some(mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_with(matcher: &FuzzyMatcher, query: &str, field: &str) -> Option<f64> {
        let pattern = Pattern::parse(query).unwrap();
        matcher.score(&matcher.compile(&pattern), &words(field))
    }

    fn score(query: &str, field: &str) -> Option<f64> {
        score_with(&FuzzyMatcher::default(), query, field)
    }

    #[test]
    fn edit_budget_grows_with_word_length() {
        assert_eq!(allowed_edits(4), 0);
        assert_eq!(allowed_edits(5), 1);
        assert_eq!(allowed_edits(7), 1);
        assert_eq!(allowed_edits(8), 2);
    }

    #[test]
    fn words_split_on_punctuation() {
        assert_eq!(words("Let's knead, fold!"), vec!["let", "s", "knead", "fold"]);
    }

    #[test]
    fn exact_word_and_prefix_score_zero() {
        assert_eq!(score("basics", "Python Basics"), Some(0.0));
        assert_eq!(score("pyth", "Python Basics"), Some(0.0));
    }

    #[test]
    fn tolerates_a_single_typo() {
        let s = score("pythn", "Python Basics").unwrap();
        assert!((s - 0.2).abs() < 1e-9);
        let swapped = score("pyhton", "Python Basics").unwrap();
        assert!((swapped - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn short_words_need_an_exact_match() {
        assert_eq!(score("rust", "Let the dough rest for just ten minutes"), None);
        assert_eq!(score("go", "Rust basics"), None);
    }

    #[test]
    fn long_words_allow_two_edits() {
        assert!(score("ownrshp", "Ownership rules").is_none());
        assert!(score("ownershp", "Ownership rules").is_some());
        assert!(score("owenrshp", "Ownership rules").is_some());
    }

    #[test]
    fn rejects_unrelated_text() {
        assert_eq!(score("pythn", "Sourdough starter care"), None);
    }

    #[test]
    fn every_query_word_must_match() {
        assert!(score("basics python", "Python Basics").is_some());
        assert_eq!(score("basics cobol", "Python Basics"), None);
    }

    #[test]
    fn zero_threshold_rejects_typos() {
        let strict = FuzzyMatcher::new(0.0);
        assert_eq!(score_with(&strict, "python", "Python"), Some(0.0));
        assert_eq!(score_with(&strict, "pythn", "Python"), None);
    }

    #[test]
    fn punctuation_only_query_matches_nothing() {
        assert_eq!(score("!!", "Python"), None);
        assert!(Pattern::parse("   ").is_none());
    }

    #[test]
    fn threshold_is_clamped() {
        assert!((FuzzyMatcher::new(4.0).threshold() - 1.0).abs() < f64::EPSILON);
        assert!(FuzzyMatcher::new(-1.0).threshold().abs() < f64::EPSILON);
    }
}
