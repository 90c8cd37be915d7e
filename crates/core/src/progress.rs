use serde::{Deserialize, Serialize};
use std::fmt;

/// Reading progress through a lesson, as a whole percentage (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct ProgressPercent(u8);

impl ProgressPercent {
    pub const COMPLETE: ProgressPercent = ProgressPercent(100);

    /// Clamp any integer into 0-100.
    #[must_use]
    pub fn new(value: i64) -> Self {
        // clamped first, so the cast cannot truncate
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = value.clamp(0, 100) as u8;
        Self(percent)
    }

    /// Progress from the page scroll position.
    ///
    /// The scrollable range is `document_height - viewport_height`; when nothing
    /// can scroll the progress is zero.
    #[must_use]
    pub fn from_scroll(scroll_y: f64, document_height: f64, viewport_height: f64) -> Self {
        let scrollable = document_height - viewport_height;
        let ratio = if scrollable > 0.0 {
            (scroll_y / scrollable).clamp(0.0, 1.0)
        } else {
            0.0
        };
        #[allow(clippy::cast_possible_truncation)]
        let percent = (ratio * 100.0).round() as i64;
        Self::new(percent)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_started(self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for ProgressPercent {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<ProgressPercent> for u8 {
    fn from(progress: ProgressPercent) -> Self {
        progress.0
    }
}

impl fmt::Display for ProgressPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
