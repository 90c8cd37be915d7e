//! Small text helpers shared by catalog views.

use chrono::NaiveDate;
use std::fmt;

use crate::time::Clock;

/// Human-readable duration: `"45 min"` below an hour, `"2h 5m"` otherwise.
///
/// Missing or zero durations render as an empty string.
#[must_use]
pub fn format_duration(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => String::new(),
        Some(m) if m < 60 => format!("{m} min"),
        Some(m) => format!("{}h {}m", m / 60, m % 60),
    }
}

/// Short US-style date, e.g. `"Jan 5, 2024"`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Lowercase anchor slug: runs of anything but `a-z0-9` collapse to one `-`,
/// with no leading or trailing dash.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Time-of-day greeting shown above the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Morning,
    Afternoon,
    Evening,
}

impl Greeting {
    #[must_use]
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            0..12 => Greeting::Morning,
            12..18 => Greeting::Afternoon,
            _ => Greeting::Evening,
        }
    }

    #[must_use]
    pub fn from_clock(clock: &Clock) -> Self {
        Self::for_hour(clock.local_hour())
    }

    #[must_use]
    pub fn period(self) -> &'static str {
        match self {
            Greeting::Morning => "Good morning",
            Greeting::Afternoon => "Good afternoon",
            Greeting::Evening => "Good evening",
        }
    }
}

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, curious mind ✨", self.period())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_clock;

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(None), "");
        assert_eq!(format_duration(Some(0)), "");
        assert_eq!(format_duration(Some(45)), "45 min");
        assert_eq!(format_duration(Some(60)), "1h 0m");
        assert_eq!(format_duration(Some(185)), "3h 5m");
    }

    #[test]
    fn date_formats_without_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "Jan 5, 2024");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Why Knead?"), "why-knead");
        assert_eq!(slugify("  --Ownership & Borrowing 101!  "), "ownership-borrowing-101");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn greeting_periods() {
        assert_eq!(Greeting::for_hour(0), Greeting::Morning);
        assert_eq!(Greeting::for_hour(11), Greeting::Morning);
        assert_eq!(Greeting::for_hour(12), Greeting::Afternoon);
        assert_eq!(Greeting::for_hour(17), Greeting::Afternoon);
        assert_eq!(Greeting::for_hour(18), Greeting::Evening);
        assert_eq!(Greeting::from_clock(&fixed_clock()), Greeting::Evening);
        assert_eq!(
            Greeting::Morning.to_string(),
            "Good morning, curious mind ✨"
        );
    }
}
