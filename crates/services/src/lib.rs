#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod config;
pub mod content;
pub mod error;
pub mod progress_service;

pub use catalog_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::{CatalogService, course_page, lesson_page};
pub use config::{CatalogConfig, ContentLocation, ProgressBackend};
pub use content::{
    ContentLoader, ContentSource, FsContentSource, HttpContentSource, InMemoryContentSource,
};
pub use error::{AppServicesError, CatalogError, ConfigError, ContentLoadError, ProgressError};
pub use progress_service::{LAST_LESSON_KEY, LESSON_PROGRESS_KEY, ProgressService};
