mod course;
mod date;
mod difficulty;
mod ids;
mod lesson;
mod tag;

pub use ids::{CourseId, LessonId, ParseIdError};

pub use course::{Course, DEFAULT_COURSE_MINUTES, Module, default_course_created_on};
pub use difficulty::{Difficulty, DifficultyError};
pub use lesson::{Lesson, QuizFeedback, QuizQuestion, Section};
pub use date::parse_calendar_date;
pub use tag::{TagError, TagName};
