//! Window offsets keyed by normalized granularity unit.
//!
//! | unit    | anomaly window (buckets) | analysis window (days) |
//! |---------|--------------------------|------------------------|
//! | MINUTES | -120                     | -1                     |
//! | HOURS   | -3                       | -2                     |
//! | DAYS    | -1                       | -7                     |
//! | other   | -1                       | -1                     |

use rca_core::granularity::TimeUnit;

/// How many granularity buckets the anomaly window reaches back.
#[must_use]
pub const fn anomaly_offset(unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Minutes => -120,
        TimeUnit::Hours => -3,
        _ => -1,
    }
}

/// How many days before the anomaly start the analysis window begins.
#[must_use]
pub const fn analysis_offset_days(unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Minutes => -1,
        TimeUnit::Hours => -2,
        TimeUnit::Days => -7,
        _ => -1,
    }
}
