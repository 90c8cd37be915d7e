use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::format::slugify;
use crate::model::difficulty::Difficulty;
use crate::model::ids::LessonId;
use crate::model::tag::TagName;

//
// ─── SECTIONS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl Section {
    /// Anchor used by the lesson table of contents.
    #[must_use]
    pub fn anchor(&self) -> String {
        slugify(&self.title)
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer_index: usize,
    #[serde(default)]
    pub explanation: String,
}

/// Feedback shown for one quiz question after checking answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizFeedback {
    Unanswered,
    Correct,
    Incorrect { explanation: String },
}

impl QuizFeedback {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            QuizFeedback::Unanswered => "Pick an answer to check.",
            QuizFeedback::Correct => "Correct!",
            QuizFeedback::Incorrect { explanation } => explanation,
        }
    }

    /// True for feedback rendered with the warning style.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        !matches!(self, QuizFeedback::Correct)
    }
}

impl QuizQuestion {
    #[must_use]
    pub fn check(&self, selected: Option<usize>) -> QuizFeedback {
        match selected {
            None => QuizFeedback::Unanswered,
            Some(choice) if choice == self.answer_index => QuizFeedback::Correct,
            Some(_) => QuizFeedback::Incorrect {
                explanation: self.explanation.clone(),
            },
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// Atomic content unit loaded from its own document.
///
/// Optional fields stay `None`/empty when the document omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<TagName>,
    #[serde(default, with = "crate::model::date::optional")]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub tldr: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

impl Lesson {
    #[must_use]
    pub fn has_quiz(&self) -> bool {
        !self.quiz.is_empty()
    }

    /// Section bodies joined with single spaces, used as searchable body text.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.body.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[must_use]
    pub fn shares_tag_with(&self, other: &Lesson) -> bool {
        self.tags.iter().any(|tag| other.tags.contains(tag))
    }

    /// Check one answer per question; missing entries count as unanswered.
    #[must_use]
    pub fn check_quiz(&self, answers: &[Option<usize>]) -> Vec<QuizFeedback> {
        self.quiz
            .iter()
            .enumerate()
            .map(|(index, question)| question.check(answers.get(index).copied().flatten()))
            .collect()
    }
}
