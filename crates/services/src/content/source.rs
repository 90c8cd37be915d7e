use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::ContentLoadError;

/// Where catalog documents come from.
///
/// `path` is always relative, e.g. `content/courses.json`.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the raw document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ContentLoadError` naming `path` when the document cannot be read.
    async fn fetch(&self, path: &str) -> Result<String, ContentLoadError>;
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Fetches documents over HTTP relative to a base URL.
#[derive(Clone, Debug)]
pub struct HttpContentSource {
    client: Client,
    base: Url,
}

impl HttpContentSource {
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self::with_client(Client::new(), base)
    }

    /// The base is treated as a directory even without a trailing slash.
    #[must_use]
    pub fn with_client(client: Client, mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { client, base }
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a relative document path.
    ///
    /// # Errors
    ///
    /// Returns `ContentLoadError::InvalidUrl` if the path cannot be joined.
    pub fn resolve(&self, path: &str) -> Result<Url, ContentLoadError> {
        self.base
            .join(path)
            .map_err(|source| ContentLoadError::InvalidUrl {
                resource: path.to_owned(),
                source,
            })
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentLoadError> {
        let url = self.resolve(path)?;
        debug!(%url, "fetching content");

        let transport = |source| ContentLoadError::Transport {
            resource: path.to_owned(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(ContentLoadError::HttpStatus {
                resource: path.to_owned(),
                status: response.status(),
            });
        }
        response.text().await.map_err(transport)
    }
}

//
// ─── FILESYSTEM ────────────────────────────────────────────────────────────────
//

/// Reads documents from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentLoadError> {
        let full = self.root.join(path);
        debug!(path = %full.display(), "reading content");
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ContentLoadError::NotFound {
                    resource: path.to_owned(),
                },
                _ => ContentLoadError::Io {
                    resource: path.to_owned(),
                    source,
                },
            })
    }
}

//
// ─── IN MEMORY ─────────────────────────────────────────────────────────────────
//

/// Fixed set of documents, for tests and prototyping.
///
/// Records every requested path so callers can count fetches.
#[derive(Clone, Debug, Default)]
pub struct InMemoryContentSource {
    documents: HashMap<String, String>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl InMemoryContentSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(path.into(), body.into());
        self
    }

    #[must_use]
    pub fn with_json(self, path: impl Into<String>, value: &serde_json::Value) -> Self {
        self.with_document(path, value.to_string())
    }

    /// Paths requested so far, in request order.
    #[must_use]
    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentSource for InMemoryContentSource {
    async fn fetch(&self, path: &str) -> Result<String, ContentLoadError> {
        if let Ok(mut log) = self.fetched.lock() {
            log.push(path.to_owned());
        }
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| ContentLoadError::NotFound {
                resource: path.to_owned(),
            })
    }
}
