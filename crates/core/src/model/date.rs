//! Lenient decoding of `createdAt` values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Calendar date of a `YYYY-MM-DD` value, an RFC 3339 timestamp, or a timestamp
/// without offset. Timestamps keep the date as written, ignoring the offset.
#[must_use]
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|at| at.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|at| at.date())
        })
}

/// `#[serde(with = ...)]` adapter for optional dates.
pub(crate) mod optional {
    use chrono::NaiveDate;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::parse_calendar_date;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                parse_calendar_date(&raw)
                    .ok_or_else(|| D::Error::custom(format!("invalid date: {raw:?}")))
            })
            .transpose()
    }
}
