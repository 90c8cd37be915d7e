//! View models for the course detail and lesson reader pages.

use thiserror::Error;

use crate::catalog::Catalog;
use crate::model::{Course, CourseId, Lesson, LessonId, Module};

/// Raised when a lesson page has no lesson or no owning course to show.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Lesson not found")]
pub struct LessonNotFound;

//
// ─── COURSE PAGE ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleView<'a> {
    pub title: &'a str,
    /// Resolvable lessons only; dangling references are dropped.
    pub lessons: Vec<&'a Lesson>,
}

impl<'a> ModuleView<'a> {
    fn new(catalog: &'a Catalog, module: &'a Module) -> Self {
        Self {
            title: &module.title,
            lessons: module
                .lessons
                .iter()
                .filter_map(|id| catalog.lesson(id))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoursePage<'a> {
    pub course: &'a Course,
    pub modules: Vec<ModuleView<'a>>,
}

impl<'a> CoursePage<'a> {
    /// Page for the requested course, falling back to the first course.
    ///
    /// Returns `None` only for an empty catalog.
    #[must_use]
    pub fn build(catalog: &'a Catalog, id: Option<&CourseId>) -> Option<Self> {
        let course = catalog.course_or_default(id)?;
        Some(Self {
            course,
            modules: course
                .modules
                .iter()
                .map(|module| ModuleView::new(catalog, module))
                .collect(),
        })
    }
}

//
// ─── LESSON PAGE ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarLink<'a> {
    pub lesson: &'a Lesson,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarModule<'a> {
    pub title: &'a str,
    pub links: Vec<SidebarLink<'a>>,
}

/// Maximum number of related lessons listed under a lesson.
pub const RELATED_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct LessonPage<'a> {
    pub lesson: &'a Lesson,
    pub course: &'a Course,
    pub module: &'a Module,
    pub toc: Vec<TocEntry>,
    pub previous: Option<&'a Lesson>,
    pub next: Option<&'a Lesson>,
    pub related: Vec<&'a Lesson>,
    pub sidebar: Vec<SidebarModule<'a>>,
}

impl<'a> LessonPage<'a> {
    /// Page for the requested lesson, or the catalog's first lesson when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `LessonNotFound` when the lesson is missing from the lookup or no
    /// module references it.
    pub fn build(catalog: &'a Catalog, id: Option<&LessonId>) -> Result<Self, LessonNotFound> {
        let id = id.or_else(|| catalog.default_lesson_id()).ok_or(LessonNotFound)?;
        let lesson = catalog.lesson(id).ok_or(LessonNotFound)?;
        let (course, module) = catalog.course_module_for_lesson(id).ok_or(LessonNotFound)?;

        let toc = lesson
            .sections
            .iter()
            .map(|section| TocEntry {
                title: section.title.clone(),
                anchor: section.anchor(),
            })
            .collect();

        let order: Vec<&LessonId> = course.lesson_refs().collect();
        let position = order.iter().position(|candidate| *candidate == &lesson.id);
        let neighbour = |offset: isize| {
            position
                .and_then(|p| p.checked_add_signed(offset))
                .and_then(|p| order.get(p))
                .and_then(|id| catalog.lesson(id))
        };

        let related = catalog
            .lookup_values()
            .filter(|other| other.id != lesson.id && other.shares_tag_with(lesson))
            .take(RELATED_LIMIT)
            .collect();

        let sidebar = course
            .modules
            .iter()
            .map(|m| SidebarModule {
                title: &m.title,
                links: m
                    .lessons
                    .iter()
                    .filter_map(|lesson_id| {
                        catalog.lesson(lesson_id).map(|linked| SidebarLink {
                            lesson: linked,
                            active: lesson_id == id,
                        })
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            lesson,
            course,
            module,
            toc,
            previous: neighbour(-1),
            next: neighbour(1),
            related,
            sidebar,
        })
    }
}
