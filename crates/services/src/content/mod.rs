//! Fetching and decoding catalog content.

mod loader;
mod source;

pub use loader::{ContentLoader, MANIFEST_PATH, Manifest, lesson_path};
pub use source::{ContentSource, FsContentSource, HttpContentSource, InMemoryContentSource};
