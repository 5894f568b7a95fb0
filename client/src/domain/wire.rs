//! Serde helpers for the API's date encoding.
//!
//! The API stores dates as `YYYY-MM-DD` on write but may echo them back as
//! full ISO timestamps (`2024-07-08T00:00:00.000Z`). Only the calendar date is
//! meaningful to the client.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the calendar date prefix of an API date string.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let prefix = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

/// Render a date the way the API expects it on write.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) mod date {
    //! `#[serde(with = ...)]` adapter for required dates.
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date `{raw}`")))
    }
}

pub(crate) mod option_date {
    //! `#[serde(with = ...)]` adapter for optional dates; blanks decode as `None`.
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_date(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date `{value}`"))),
        }
    }
}

pub(crate) mod date_list {
    //! `#[serde(with = ...)]` adapter for lists of dates.
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(dates: &[NaiveDate], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(dates.len()))?;
        for date in dates {
            seq.serialize_element(&format_date(*date))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<NaiveDate>, D::Error> {
        let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        raw.iter()
            .map(|value| {
                parse_date(value)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date `{value}`")))
            })
            .collect()
    }
}
