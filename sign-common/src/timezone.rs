use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::{OffsetDateTime, UtcOffset, macros::format_description};
use time_tz::{Offset, TimeZone, timezones};

/// Where local times come from: a fixed offset, or a tz database zone whose offset follows
/// daylight saving time. Written as `-07:00` or `America/Los_Angeles` in config files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timezone {
    Fixed(UtcOffset),
    Named(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0:?} is neither a UTC offset nor a known timezone")]
pub struct UnknownTimezone(pub String);

/// Parses offsets like `-07:00`, `+05:30`, `Z` or `UTC`.
pub fn parse_utc_offset(s: &str) -> Option<UtcOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Some(UtcOffset::UTC);
    }
    UtcOffset::parse(
        s,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .ok()
}

impl Timezone {
    /// The system's current offset, or UTC when it can't be determined.
    pub fn local() -> Self {
        Self::Fixed(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    /// The offset in effect at `at`.
    pub fn offset_at(&self, at: OffsetDateTime) -> UtcOffset {
        match self {
            Self::Fixed(offset) => *offset,
            Self::Named(name) => timezones::get_by_name(name)
                .map_or(UtcOffset::UTC, |tz| tz.get_offset_utc(&at).to_utc()),
        }
    }
}

impl From<UtcOffset> for Timezone {
    fn from(offset: UtcOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl FromStr for Timezone {
    type Err = UnknownTimezone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(offset) = parse_utc_offset(s) {
            return Ok(Self::Fixed(offset));
        }
        timezones::get_by_name(s.trim())
            .map(|tz| Self::Named(tz.name()))
            .ok_or_else(|| UnknownTimezone(s.to_string()))
    }
}

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(offset) => {
                let sign = if offset.is_negative() { '-' } else { '+' };
                let (hours, minutes, _) = offset.as_hms();
                write!(
                    f,
                    "{sign}{:02}:{:02}",
                    hours.unsigned_abs(),
                    minutes.unsigned_abs()
                )
            }
            Self::Named(name) => f.write_str(name),
        }
    }
}
