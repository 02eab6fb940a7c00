//! Granularity tokens and time units.
//!
//! Upstream metadata encodes the bucket size of a time series as
//! `<count>_<UNIT>`, e.g. `5_MINUTES` or `1_DAYS`. Units are written in the
//! plural; singular spellings are accepted when parsing.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// TimeUnit
// ---------------------------------------------------------------------------

/// Calendar unit of a granularity, ordered from finest to coarsest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeUnit {
    Nanoseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Return the token spelling used in granularity strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nanoseconds => "NANOSECONDS",
            Self::Milliseconds => "MILLISECONDS",
            Self::Seconds => "SECONDS",
            Self::Minutes => "MINUTES",
            Self::Hours => "HOURS",
            Self::Days => "DAYS",
        }
    }

    /// Units finer than a minute.
    #[must_use]
    pub const fn is_sub_minute(self) -> bool {
        matches!(self, Self::Nanoseconds | Self::Milliseconds | Self::Seconds)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NANOSECONDS" | "NANOSECOND" => Ok(Self::Nanoseconds),
            "MILLISECONDS" | "MILLISECOND" => Ok(Self::Milliseconds),
            "SECONDS" | "SECOND" => Ok(Self::Seconds),
            "MINUTES" | "MINUTE" => Ok(Self::Minutes),
            "HOURS" | "HOUR" => Ok(Self::Hours),
            "DAYS" | "DAY" => Ok(Self::Days),
            other => Err(CoreError::MalformedGranularity(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Granularity
// ---------------------------------------------------------------------------

/// Bucket size of a metric's time series: `count` consecutive `unit`s.
///
/// Serializes as its token string (`"5_MINUTES"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Granularity {
    pub count: u32,
    pub unit: TimeUnit,
}

impl Granularity {
    pub const ONE_HOUR: Self = Self::new(1, TimeUnit::Hours);
    pub const ONE_DAY: Self = Self::new(1, TimeUnit::Days);

    #[must_use]
    pub const fn new(count: u32, unit: TimeUnit) -> Self {
        Self { count, unit }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.count, self.unit)
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::MalformedGranularity(s.to_string());

        let (count, unit) = s.split_once('_').ok_or_else(malformed)?;
        let count = count.parse::<u32>().map_err(|_| malformed())?;
        if count == 0 {
            return Err(malformed());
        }
        let unit = unit.parse::<TimeUnit>().map_err(|_| malformed())?;

        Ok(Self { count, unit })
    }
}

impl TryFrom<String> for Granularity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Granularity> for String {
    fn from(value: Granularity) -> Self {
        value.to_string()
    }
}
