use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::difficulty::Difficulty;
use crate::model::ids::{CourseId, LessonId};
use crate::model::tag::TagName;

/// Estimated duration used when the manifest omits `estimatedMinutes`.
pub const DEFAULT_COURSE_MINUTES: u32 = 180;

/// Creation date used when the manifest omits `createdAt` (2024-01-01).
#[must_use]
pub fn default_course_created_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// Named group of lesson references inside a course.
///
/// A module only references lessons; the lesson documents are owned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonId>,
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Top-level content unit as described by the course manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<TagName>,
    #[serde(default, with = "crate::model::date::optional")]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
    /// Free-form display string such as "6 hours".
    #[serde(default)]
    pub estimated_time: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    /// Creation date, falling back to the catalog-wide default.
    #[must_use]
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.unwrap_or_else(default_course_created_on)
    }

    /// Estimated duration, treating a missing or zero value as the default.
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.estimated_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_COURSE_MINUTES)
    }

    /// All lesson references in module order, including duplicates and dangling ids.
    pub fn lesson_refs(&self) -> impl Iterator<Item = &LessonId> {
        self.modules.iter().flat_map(|module| module.lessons.iter())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
