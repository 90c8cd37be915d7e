use std::env;
use std::path::PathBuf;

use url::Url;

use crate::error::ConfigError;

pub const CONTENT_ENV: &str = "CATALOG_CONTENT";
pub const DB_URL_ENV: &str = "CATALOG_DB_URL";
pub const DEFAULT_CONTENT: &str = ".";
pub const DEFAULT_DB_URL: &str = "sqlite://catalog.sqlite3";
/// Progress backend value selecting the in-memory store.
pub const MEMORY_BACKEND: &str = "memory";

/// Root that the `content/` tree is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentLocation {
    Http(Url),
    Directory(PathBuf),
}

impl ContentLocation {
    /// `http://` and `https://` values are base URLs; anything else is a directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a blank value or an unparsable URL.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::Empty { name: CONTENT_ENV });
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|source| ConfigError::InvalidContentUrl {
                raw: raw.to_owned(),
                source,
            })?;
            return Ok(Self::Http(url));
        }
        Ok(Self::Directory(PathBuf::from(raw)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressBackend {
    Memory,
    Sqlite(String),
}

impl ProgressBackend {
    /// # Errors
    ///
    /// Returns `ConfigError::Empty` for a blank value.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::Empty { name: DB_URL_ENV });
        }
        if raw.eq_ignore_ascii_case(MEMORY_BACKEND) {
            return Ok(Self::Memory);
        }
        Ok(Self::Sqlite(raw.to_owned()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub content: ContentLocation,
    pub progress: ProgressBackend,
}

impl CatalogConfig {
    /// Read `CATALOG_CONTENT` and `CATALOG_DB_URL`, using defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            env::var(CONTENT_ENV).ok().as_deref(),
            env::var(DB_URL_ENV).ok().as_deref(),
        )
    }

    /// Build from optional raw values, e.g. command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is invalid.
    pub fn from_values(content: Option<&str>, db_url: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            content: ContentLocation::parse(content.unwrap_or(DEFAULT_CONTENT))?,
            progress: ProgressBackend::parse(db_url.unwrap_or(DEFAULT_DB_URL))?,
        })
    }
}
