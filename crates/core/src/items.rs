//! Flattening courses and lessons into one searchable list.

use chrono::NaiveDate;
use tracing::debug;

use crate::catalog::Catalog;
use crate::model::{Course, Difficulty, Lesson, Module, TagName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Course,
    Lesson,
}

impl ItemKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Course => "course",
            ItemKind::Lesson => "lesson",
        }
    }
}

/// Where a lesson item was reached from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonContext {
    pub course_title: String,
    pub module_title: String,
}

/// Uniform projection of a course or lesson used by search, filter and sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub category: String,
    pub tags: Vec<TagName>,
    pub created_at: Option<NaiveDate>,
    pub duration_minutes: Option<u32>,
    pub url: String,
    pub body_text: String,
    /// Present only for lesson items.
    pub context: Option<LessonContext>,
}

impl SearchableItem {
    fn from_course(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            kind: ItemKind::Course,
            title: course.title.clone(),
            description: course.description.clone(),
            difficulty: Some(course.difficulty),
            category: course.category.clone(),
            tags: course.tags.clone(),
            created_at: Some(course.created_on()),
            duration_minutes: Some(course.duration_minutes()),
            url: course_url(course.id.as_str()),
            body_text: course.outcomes.join(" "),
            context: None,
        }
    }

    fn from_lesson(lesson: &Lesson, course: &Course, module: &Module) -> Self {
        Self {
            id: lesson.id.to_string(),
            kind: ItemKind::Lesson,
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            difficulty: lesson.difficulty,
            category: course.category.clone(),
            tags: lesson.tags.clone(),
            created_at: lesson.created_at,
            duration_minutes: lesson.duration_minutes,
            url: lesson_url(lesson.id.as_str()),
            body_text: lesson.body_text(),
            context: Some(LessonContext {
                course_title: course.title.clone(),
                module_title: module.title.clone(),
            }),
        }
    }

    #[must_use]
    pub fn has_tag(&self, tag: &TagName) -> bool {
        self.tags.contains(tag)
    }

    /// Secondary line on a result card: the category for courses,
    /// `"<course> · <module>"` for lessons.
    #[must_use]
    pub fn meta_line(&self) -> String {
        match &self.context {
            Some(ctx) => format!("{} · {}", ctx.course_title, ctx.module_title),
            None => self.category.clone(),
        }
    }

    #[must_use]
    pub fn thumbnail(&self) -> String {
        thumbnail_label(&self.title)
    }
}

#[must_use]
pub fn course_url(id: &str) -> String {
    format!("course.html?id={id}")
}

#[must_use]
pub fn lesson_url(id: &str) -> String {
    format!("lesson.html?id={id}")
}

/// Build the item list: every course in manifest order, then one lesson item
/// per resolvable (course, module, reference) occurrence.
///
/// Dangling lesson references produce nothing.
#[must_use]
pub fn build_items(catalog: &Catalog) -> Vec<SearchableItem> {
    let mut items: Vec<SearchableItem> = catalog
        .courses()
        .iter()
        .map(SearchableItem::from_course)
        .collect();

    for course in catalog.courses() {
        for module in &course.modules {
            for lesson_id in &module.lessons {
                let Some(lesson) = catalog.lesson(lesson_id) else {
                    debug!(course = %course.id, lesson = %lesson_id, "skipping dangling lesson reference");
                    continue;
                };
                items.push(SearchableItem::from_lesson(lesson, course, module));
            }
        }
    }

    items
}

/// Initials of the first two words of a title, uppercased ("Python Basics" → "PB").
#[must_use]
pub fn thumbnail_label(title: &str) -> String {
    title
        .split(' ')
        .take(2)
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
}
