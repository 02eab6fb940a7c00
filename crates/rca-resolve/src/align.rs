//! Calendar alignment of timestamps in a reference time zone.
//!
//! Every operation works on the wall-clock reading of the timestamp in its own
//! zone, so callers that agree on the zone get identical results. Flooring to
//! a wall-clock time that falls into a daylight-saving gap or repeated hour
//! resolves with the offset in effect before the floor.

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Timelike,
    Utc,
};
use rca_core::granularity::{Granularity, TimeUnit};

/// Interpret epoch milliseconds in `tz`. `None` outside chrono's range.
#[must_use]
pub fn at<Tz: TimeZone>(tz: &Tz, millis: i64) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|utc| utc.with_timezone(tz))
}

/// Truncate `ts` to the start of the `unit`-period containing it.
#[must_use]
pub fn floor_to_unit<Tz: TimeZone>(ts: &DateTime<Tz>, unit: TimeUnit) -> DateTime<Tz> {
    let local = ts.naive_local();
    let floored = match unit {
        TimeUnit::Nanoseconds => return ts.clone(),
        TimeUnit::Milliseconds => {
            local.with_nanosecond(local.nanosecond() / 1_000_000 * 1_000_000)
        }
        TimeUnit::Seconds => local.with_nanosecond(0),
        TimeUnit::Minutes => local.date().and_hms_opt(local.hour(), local.minute(), 0),
        TimeUnit::Hours => local.date().and_hms_opt(local.hour(), 0, 0),
        TimeUnit::Days => local.date().and_hms_opt(0, 0, 0),
    };

    floored.map_or_else(|| ts.clone(), |naive| resolve_local(ts, naive))
}

/// The calendar field of `ts` that `unit` counts: second of minute, minute
/// of hour, hour of day, or day of week counted from Sunday.
#[must_use]
pub fn value_in_unit<Tz: TimeZone>(ts: &DateTime<Tz>, unit: TimeUnit) -> i64 {
    let local = ts.naive_local();
    match unit {
        TimeUnit::Nanoseconds => i64::from(local.nanosecond()),
        TimeUnit::Milliseconds => i64::from(local.nanosecond() / 1_000_000),
        TimeUnit::Seconds => i64::from(local.second()),
        TimeUnit::Minutes => i64::from(local.minute()),
        TimeUnit::Hours => i64::from(local.hour()),
        TimeUnit::Days => i64::from(local.weekday().num_days_from_sunday()),
    }
}

/// Floor `ts` to the granularity's unit, then step back to the nearest lower
/// multiple of its count (e.g. `15_MINUTES` snaps to :00, :15, :30, :45).
#[must_use]
pub fn snap_to_granularity<Tz: TimeZone>(
    ts: &DateTime<Tz>,
    granularity: Granularity,
) -> Option<DateTime<Tz>> {
    let floored = floor_to_unit(ts, granularity.unit);
    let remainder = value_in_unit(&floored, granularity.unit) % i64::from(granularity.count);
    shift(&floored, -remainder, granularity.unit)
}

/// Move `ts` by `amount` units. Days move by calendar day, keeping the
/// wall-clock time; all finer units move by elapsed time.
#[must_use]
pub fn shift<Tz: TimeZone>(ts: &DateTime<Tz>, amount: i64, unit: TimeUnit) -> Option<DateTime<Tz>> {
    let delta = match unit {
        TimeUnit::Nanoseconds => TimeDelta::nanoseconds(amount),
        TimeUnit::Milliseconds => TimeDelta::try_milliseconds(amount)?,
        TimeUnit::Seconds => TimeDelta::try_seconds(amount)?,
        TimeUnit::Minutes => TimeDelta::try_minutes(amount)?,
        TimeUnit::Hours => TimeDelta::try_hours(amount)?,
        TimeUnit::Days => return shift_days(ts, amount),
    };
    ts.clone().checked_add_signed(delta)
}

fn shift_days<Tz: TimeZone>(ts: &DateTime<Tz>, amount: i64) -> Option<DateTime<Tz>> {
    let days = Days::new(amount.unsigned_abs());
    let local = ts.naive_local();
    let moved = if amount >= 0 {
        local.checked_add_days(days)?
    } else {
        local.checked_sub_days(days)?
    };
    Some(resolve_local(ts, moved))
}

/// Map a wall-clock time back into `reference`'s zone. Inside a repeated
/// hour the instant sharing `reference`'s offset wins; inside a gap the
/// wall-clock time is read with `reference`'s offset.
fn resolve_local<Tz: TimeZone>(reference: &DateTime<Tz>, naive: NaiveDateTime) -> DateTime<Tz> {
    let tz = reference.timezone();
    let reference_offset = reference.offset().fix();
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(resolved) => resolved,
        LocalResult::Ambiguous(earliest, latest) => {
            if latest.offset().fix() == reference_offset {
                latest
            } else {
                earliest
            }
        }
        LocalResult::None => tz.from_utc_datetime(&(naive - reference_offset)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate};
    use pretty_assertions::assert_eq;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn floors_to_each_unit() {
        let ts = utc(2017, 7, 14, 2, 47, 31) + TimeDelta::milliseconds(123);

        assert_eq!(floor_to_unit(&ts, TimeUnit::Nanoseconds), ts);
        assert_eq!(
            floor_to_unit(&ts, TimeUnit::Milliseconds),
            utc(2017, 7, 14, 2, 47, 31) + TimeDelta::milliseconds(123)
        );
        assert_eq!(floor_to_unit(&ts, TimeUnit::Seconds), utc(2017, 7, 14, 2, 47, 31));
        assert_eq!(floor_to_unit(&ts, TimeUnit::Minutes), utc(2017, 7, 14, 2, 47, 0));
        assert_eq!(floor_to_unit(&ts, TimeUnit::Hours), utc(2017, 7, 14, 2, 0, 0));
        assert_eq!(floor_to_unit(&ts, TimeUnit::Days), utc(2017, 7, 14, 0, 0, 0));
    }

    #[test]
    fn day_floor_follows_the_reference_zone() {
        let pacific = FixedOffset::west_opt(7 * 3600).unwrap();
        // 02:00 UTC on the 14th is 19:00 on the 13th in UTC-7.
        let ts = utc(2017, 7, 14, 2, 0, 0).with_timezone(&pacific);

        let floored = floor_to_unit(&ts, TimeUnit::Days);
        assert_eq!(
            floored.naive_local(),
            NaiveDate::from_ymd_opt(2017, 7, 13)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(floored.with_timezone(&Utc), utc(2017, 7, 13, 7, 0, 0));
    }

    #[test]
    fn hour_floor_keeps_the_offset_inside_a_repeated_hour() {
        use chrono_tz::America::New_York;

        // 2017-11-05 01:00-02:00 occurs twice in New York: EDT, then EST.
        let first = utc(2017, 11, 5, 5, 30, 0).with_timezone(&New_York);
        let second = utc(2017, 11, 5, 6, 30, 0).with_timezone(&New_York);
        assert_eq!(first.naive_local(), second.naive_local());

        let floored = floor_to_unit(&first, TimeUnit::Hours);
        assert_eq!(floored.timestamp_millis(), utc(2017, 11, 5, 5, 0, 0).timestamp_millis());

        let floored = floor_to_unit(&second, TimeUnit::Hours);
        assert_eq!(floored.timestamp_millis(), utc(2017, 11, 5, 6, 0, 0).timestamp_millis());
        assert_eq!(floored.offset().fix(), second.offset().fix());
    }

    #[test]
    fn snaps_minutes_to_count_multiples() {
        let ts = utc(2017, 7, 14, 2, 47, 31);
        let snapped = snap_to_granularity(&ts, Granularity::new(15, TimeUnit::Minutes)).unwrap();
        assert_eq!(snapped, utc(2017, 7, 14, 2, 45, 0));

        let snapped = snap_to_granularity(&ts, Granularity::new(5, TimeUnit::Minutes)).unwrap();
        assert_eq!(snapped, utc(2017, 7, 14, 2, 45, 0));

        let snapped = snap_to_granularity(&ts, Granularity::new(7, TimeUnit::Minutes)).unwrap();
        assert_eq!(snapped, utc(2017, 7, 14, 2, 42, 0));
    }

    #[test]
    fn snaps_hours_to_count_multiples() {
        let ts = utc(2017, 7, 14, 5, 10, 0);
        let snapped = snap_to_granularity(&ts, Granularity::new(3, TimeUnit::Hours)).unwrap();
        assert_eq!(snapped, utc(2017, 7, 14, 3, 0, 0));
    }

    #[test]
    fn snaps_days_to_weekday_multiples() {
        // 2017-07-14 is a Friday (5 days after Sunday).
        let ts = utc(2017, 7, 14, 13, 0, 0);
        assert_eq!(value_in_unit(&ts, TimeUnit::Days), 5);

        let snapped = snap_to_granularity(&ts, Granularity::new(7, TimeUnit::Days)).unwrap();
        assert_eq!(snapped, utc(2017, 7, 9, 0, 0, 0));

        let snapped = snap_to_granularity(&ts, Granularity::ONE_DAY).unwrap();
        assert_eq!(snapped, utc(2017, 7, 14, 0, 0, 0));
    }

    #[test]
    fn snapping_is_idempotent() {
        let g = Granularity::new(15, TimeUnit::Minutes);
        let once = snap_to_granularity(&utc(2017, 7, 14, 2, 47, 31), g).unwrap();
        assert_eq!(snap_to_granularity(&once, g).unwrap(), once);
    }

    #[test]
    fn shifts_by_elapsed_time_and_calendar_days() {
        let ts = utc(2017, 7, 14, 2, 0, 0);
        assert_eq!(shift(&ts, -120, TimeUnit::Minutes).unwrap(), utc(2017, 7, 14, 0, 0, 0));
        assert_eq!(shift(&ts, -3, TimeUnit::Hours).unwrap(), utc(2017, 7, 13, 23, 0, 0));
        assert_eq!(shift(&ts, 1, TimeUnit::Days).unwrap(), utc(2017, 7, 15, 2, 0, 0));
        assert_eq!(shift(&ts, -7, TimeUnit::Days).unwrap(), utc(2017, 7, 7, 2, 0, 0));
        assert_eq!(shift(&ts, 90, TimeUnit::Seconds).unwrap(), utc(2017, 7, 14, 2, 1, 30));
    }

    #[test]
    fn shift_out_of_range_is_none() {
        let ts = utc(2017, 7, 14, 2, 0, 0);
        assert!(shift(&ts, i64::MAX, TimeUnit::Hours).is_none());
        assert!(shift(&ts, i64::MIN, TimeUnit::Days).is_none());
    }

    #[test]
    fn at_interprets_millis_in_zone() {
        let zone = FixedOffset::east_opt(3600).unwrap();
        let ts = at(&zone, 1_500_000_000_000).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_500_000_000_000);
        assert_eq!(ts.hour(), 3);
        assert!(at(&Utc, i64::MAX).is_none());
    }
}
