//! Anomaly and analysis window computation.
//!
//! Anomaly windows are metric-granular; analysis windows are always whole
//! days in the reference zone.

use chrono::{DateTime, TimeZone};
use rca_core::context::TimeRange;
use rca_core::granularity::{Granularity, TimeUnit};

use crate::align::{floor_to_unit, shift, snap_to_granularity};
use crate::offsets::{analysis_offset_days, anomaly_offset};

/// Window ending at the last complete bucket boundary at or before `max_time`
/// and reaching back [`anomaly_offset`] buckets.
///
/// Returns `None` when the window falls outside the representable range.
#[must_use]
pub fn anomaly_range<Tz: TimeZone>(
    max_time: &DateTime<Tz>,
    granularity: Granularity,
) -> Option<TimeRange> {
    let end = snap_to_granularity(max_time, granularity)?;
    let steps = anomaly_offset(granularity.unit).checked_mul(i64::from(granularity.count))?;
    let start = shift(&end, steps, granularity.unit)?;
    Some(TimeRange::new(start.timestamp_millis(), end.timestamp_millis()))
}

/// Day-aligned window from [`analysis_offset_days`] before the start of the
/// anomaly's first day through the end of the anomaly's last day.
///
/// Returns `None` when the window falls outside the representable range.
#[must_use]
pub fn analysis_range<Tz: TimeZone>(
    anomaly_start: &DateTime<Tz>,
    anomaly_end: &DateTime<Tz>,
    granularity: Granularity,
) -> Option<TimeRange> {
    let end = shift(&floor_to_unit(anomaly_end, TimeUnit::Days), 1, TimeUnit::Days)?;
    let start = shift(
        &floor_to_unit(anomaly_start, TimeUnit::Days),
        analysis_offset_days(granularity.unit),
        TimeUnit::Days,
    )?;
    Some(TimeRange::new(start.timestamp_millis(), end.timestamp_millis()))
}
