#![forbid(unsafe_code)]

pub mod browse;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod format;
pub mod items;
pub mod model;
pub mod pages;
pub mod progress;
pub mod search;
pub mod time;

pub use browse::{BrowseSession, ResultSet};
pub use catalog::Catalog;
pub use error::Error;
pub use items::{ItemKind, SearchableItem, build_items};
pub use progress::ProgressPercent;
pub use time::Clock;
