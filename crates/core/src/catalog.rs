//! Loaded catalog content and the lookups the views need.

use std::collections::{HashMap, HashSet};

use crate::model::{Course, CourseId, Lesson, LessonId, Module};

/// Distinct lesson ids referenced by any module, in first-seen order.
#[must_use]
pub fn referenced_lesson_ids(courses: &[Course]) -> Vec<LessonId> {
    let mut seen = HashSet::new();
    courses
        .iter()
        .flat_map(Course::lesson_refs)
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}

/// Courses, their lesson documents, and a lookup from lesson id to lesson.
///
/// Immutable once built; every page load builds a fresh one.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    lessons: Vec<Lesson>,
    lookup: HashMap<LessonId, usize>,
}

impl Catalog {
    /// Build the catalog; when two lessons share an id the later one wins the lookup.
    #[must_use]
    pub fn new(courses: Vec<Course>, lessons: Vec<Lesson>) -> Self {
        let lookup = lessons
            .iter()
            .enumerate()
            .map(|(index, lesson)| (lesson.id.clone(), index))
            .collect();
        Self {
            courses,
            lessons,
            lookup,
        }
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lookup.get(id).map(|index| &self.lessons[*index])
    }

    /// Lessons reachable through the lookup, in load order.
    pub fn lookup_values(&self) -> impl Iterator<Item = &Lesson> {
        self.lessons
            .iter()
            .enumerate()
            .filter(|(index, lesson)| self.lookup.get(&lesson.id) == Some(index))
            .map(|(_, lesson)| lesson)
    }

    #[must_use]
    pub fn course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| &course.id == id)
    }

    /// The requested course, or the first course when the id is missing or unknown.
    #[must_use]
    pub fn course_or_default(&self, id: Option<&CourseId>) -> Option<&Course> {
        id.and_then(|id| self.course(id))
            .or_else(|| self.courses.first())
    }

    /// First course and module whose module references the lesson.
    #[must_use]
    pub fn course_module_for_lesson(&self, id: &LessonId) -> Option<(&Course, &Module)> {
        self.courses.iter().find_map(|course| {
            course
                .modules
                .iter()
                .find(|module| module.lessons.contains(id))
                .map(|module| (course, module))
        })
    }

    /// First lesson reference of the first module of the first course.
    #[must_use]
    pub fn default_lesson_id(&self) -> Option<&LessonId> {
        self.courses
            .first()
            .and_then(|course| course.modules.first())
            .and_then(|module| module.lessons.first())
    }
}
