//! Shared error types for the services crate.

use thiserror::Error;

use catalog_core::pages::LessonNotFound;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while fetching or decoding catalog content.
///
/// Every variant names the resource that failed so the message can be shown as-is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentLoadError {
    #[error("Failed to load {resource}: HTTP status {status}")]
    HttpStatus {
        resource: String,
        status: reqwest::StatusCode,
    },
    #[error("Failed to load {resource}: {source}")]
    Transport {
        resource: String,
        source: reqwest::Error,
    },
    #[error("Failed to load {resource}: not found")]
    NotFound { resource: String },
    #[error("Failed to load {resource}: {source}")]
    Io {
        resource: String,
        source: std::io::Error,
    },
    #[error("Failed to parse {resource}: {source}")]
    Decode {
        resource: String,
        source: serde_json::Error,
    },
    #[error("Failed to load {resource}: invalid location ({source})")]
    InvalidUrl {
        resource: String,
        source: url::ParseError,
    },
    #[error("lesson fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ContentLoadError {
    /// The resource that failed, when the failure belongs to one.
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        match self {
            ContentLoadError::HttpStatus { resource, .. }
            | ContentLoadError::Transport { resource, .. }
            | ContentLoadError::NotFound { resource }
            | ContentLoadError::Io { resource, .. }
            | ContentLoadError::Decode { resource, .. }
            | ContentLoadError::InvalidUrl { resource, .. } => Some(resource),
            ContentLoadError::Task(_) => None,
        }
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Load(#[from] ContentLoadError),
    #[error(transparent)]
    LessonNotFound(#[from] LessonNotFound),
    #[error("the course manifest lists no courses")]
    EmptyCatalog,
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored value under {key} is not valid progress data: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to encode progress for {key}: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid content URL {raw}: {source}")]
    InvalidContentUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("{name} cannot be empty")]
    Empty { name: &'static str },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
