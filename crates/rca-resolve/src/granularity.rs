//! Coarsens metric granularities to a scale the root-cause view can chart.

use rca_core::errors::CoreError;
use rca_core::granularity::{Granularity, TimeUnit};

/// Smallest number of minutes a normalized granularity may span.
pub const MIN_MINUTES: u32 = 5;

/// Normalize a granularity: sub-minute units become `5_MINUTES`, minute
/// granularities are raised to at least five minutes, hours and days pass
/// through unchanged.
#[must_use]
pub const fn normalize(granularity: Granularity) -> Granularity {
    match granularity.unit {
        TimeUnit::Nanoseconds | TimeUnit::Milliseconds | TimeUnit::Seconds => {
            Granularity::new(MIN_MINUTES, TimeUnit::Minutes)
        }
        TimeUnit::Minutes if granularity.count < MIN_MINUTES => {
            Granularity::new(MIN_MINUTES, TimeUnit::Minutes)
        }
        _ => granularity,
    }
}

/// Parse and normalize a raw `<count>_<UNIT>` token, re-encoding the result.
///
/// # Errors
///
/// Returns [`CoreError::MalformedGranularity`] when the token does not parse.
pub fn normalize_token(token: &str) -> Result<String, CoreError> {
    token
        .parse::<Granularity>()
        .map(|granularity| normalize(granularity).to_string())
}
