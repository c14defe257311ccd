//! Deadline timestamps in request bodies.
//!
//! Clients may send either an RFC 3339 timestamp or a local date-time with
//! no offset (`2025-07-27T11:55:22`). The latter is read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

use super::Patch;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, LOCAL_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

struct Deadline(DateTime<Utc>);

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s)
            .map(Deadline)
            .ok_or_else(|| de::Error::custom(format!("invalid deadline timestamp {s:?}")))
    }
}

/// For `Option<DateTime<Utc>>` fields; pair with `#[serde(default)]`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Deadline>::deserialize(deserializer)?.map(|d| d.0))
}

/// For `Patch<DateTime<Utc>>` fields; pair with `#[serde(default)]` so an
/// absent key stays [`Patch::Missing`].
pub fn deserialize_patch<'de, D>(deserializer: D) -> Result<Patch<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option(deserializer).map(Into::into)
}
