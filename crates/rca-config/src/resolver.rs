//! Resolver configuration: reference time zone, compare mode, name format.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_timezone() -> String {
    "local".to_string()
}

fn default_compare_mode() -> String {
    "WoW".to_string()
}

/// strftime rendering of `MMM D, YYYY hh:mm a`.
fn default_date_format() -> String {
    "%b %-d, %Y %I:%M %P".to_string()
}

/// Reference calendar used for every floor and shift during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The evaluating process's local time zone.
    Local,
    /// A fixed UTC offset.
    Fixed(FixedOffset),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// `"local"`, `"utc"`, or a fixed offset such as `"+05:30"`.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Compare mode used by the default context.
    #[serde(default = "default_compare_mode")]
    pub compare_mode: String,

    /// strftime pattern for the timestamp in generated session names.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            compare_mode: default_compare_mode(),
            date_format: default_date_format(),
        }
    }
}

impl ResolverConfig {
    /// Interpret the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for anything other than `local`,
    /// `utc`, or a `±HH:MM` offset.
    pub fn zone(&self) -> Result<Zone, ConfigError> {
        parse_zone(&self.timezone)
    }
}

fn parse_zone(raw: &str) -> Result<Zone, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        field: "resolver.timezone".to_string(),
        reason: format!("{reason}: '{raw}'"),
    };

    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("local") {
        return Ok(Zone::Local);
    }
    if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
        return Ok(Zone::Fixed(FixedOffset::east_opt(0).ok_or_else(|| invalid("offset"))?));
    }

    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid("expected 'local', 'utc', or ±HH:MM")),
    };
    let (hours, minutes) = rest
        .split_once(':')
        .ok_or_else(|| invalid("expected ±HH:MM"))?;
    let hours: i32 = hours.parse().map_err(|_| invalid("bad hours"))?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid("bad minutes"))?;
    if !(0..60).contains(&minutes) {
        return Err(invalid("minutes out of range"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .map(Zone::Fixed)
        .ok_or_else(|| invalid("offset out of range"))
}
