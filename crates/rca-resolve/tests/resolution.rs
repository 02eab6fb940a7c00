//! End-to-end resolution tests across the precedence branches.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rca_core::context::{SetupMode, TimeRange};
use rca_core::granularity::{Granularity, TimeUnit};
use rca_core::records::{AnomalyRecord, Attributes, MetricRecord, SessionRecord};
use rca_resolve::{Lookup, Redirect, ResolveInputs, ResolverSettings, RouteParams, resolve};

const MINUTE: i64 = 60_000;
const DAY: i64 = 24 * 60 * MINUTE;
/// 2017-07-14T00:00:00Z
const JUL_14: i64 = 1_499_990_400_000;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 7, 14, 2, 40, 15).unwrap()
}

fn settings() -> ResolverSettings {
    ResolverSettings {
        owner: "alice".to_string(),
        ..ResolverSettings::default()
    }
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn params(metric: Option<&str>, anomaly: Option<&str>, session: Option<&str>) -> RouteParams {
    RouteParams {
        metric_id: metric.map(str::to_string),
        anomaly_id: anomaly.map(str::to_string),
        session_id: session.map(str::to_string),
    }
}

fn metric_record(granularity: &str, max_time: i64) -> MetricRecord {
    MetricRecord {
        urn: "thirdeye:metric:7".to_string(),
        attributes: Attributes::from_iter([
            ("granularity", vec![granularity.to_string()]),
            ("maxTime", vec![max_time.to_string()]),
        ]),
    }
}

fn anomaly_record(with_function: bool) -> AnomalyRecord {
    let mut attributes = Attributes::from_iter([
        ("metricGranularity", vec!["5_MINUTES"]),
        ("metricId", vec!["7"]),
        ("dimensions", vec!["country"]),
        ("country", vec!["US", "UK"]),
        ("comment", vec!["checkout drop"]),
    ]);
    if with_function {
        attributes.insert("functionId", ["3"]);
    }
    AnomalyRecord {
        urn: "thirdeye:event:anomaly:42".to_string(),
        start: 1_500_000_000_000,
        end: 1_500_003_600_000,
        attributes,
    }
}

fn session_record(id: &str, updated: i64) -> SessionRecord {
    SessionRecord {
        id: id.to_string(),
        name: format!("Saved {id}"),
        text: Some("notes".to_string()),
        owner: "bob".to_string(),
        permissions: "READ".to_string(),
        updated_by: Some("carol".to_string()),
        updated,
        context_urns: vec!["thirdeye:metric:9".to_string(), "thirdeye:event:anomaly:42".to_string()],
        selected_urns: vec!["thirdeye:metric:9".to_string()],
        anomaly_range_start: 10,
        anomaly_range_end: 20,
        analysis_range_start: 0,
        analysis_range_end: 30,
        granularity: "15_MINUTES".to_string(),
        compare_mode: "Wo2W".to_string(),
        anomaly_urns: vec!["thirdeye:event:anomaly:42".to_string()],
        anomaly_id: Some("42".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Metric branch
// ---------------------------------------------------------------------------

#[test]
fn metric_with_sub_minute_granularity() {
    // 2017-07-14T02:47:31Z
    let max_time = 1_500_000_451_000;
    let inputs = ResolveInputs {
        params: params(Some("7"), None, None),
        metric: Lookup::Found(metric_record("30_SECONDS", max_time)),
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    let context = &resolution.context;

    // Snapped to 02:45, reaching back 120 five-minute buckets.
    let end = 1_500_000_300_000;
    assert_eq!(context.granularity, Granularity::new(5, TimeUnit::Minutes));
    assert_eq!(context.anomaly_range, TimeRange::new(end - 600 * MINUTE, end));
    assert_eq!(context.analysis_range, TimeRange::new(JUL_14 - DAY, JUL_14 + DAY));
    assert_eq!(context.compare_mode, "WoW");
    assert_eq!(context.urns, set(&["thirdeye:metric:7"]));
    assert!(context.anomaly_urns.is_empty());

    assert_eq!(resolution.setup_mode, SetupMode::Selected);
    assert_eq!(
        resolution.session.selected_urns,
        set(&[
            "thirdeye:metric:7",
            "frontend:metric:current:7",
            "frontend:metric:baseline:7",
        ])
    );
    assert_eq!(resolution.session.name, "New Investigation (Jul 14, 2017 02:40 am)");
    assert!(resolution.session.modified);
    assert_eq!(resolution.size_metric_urns, set(&["thirdeye:metric:7"]));
    assert!(resolution.errors.is_empty());
}

#[test]
fn metric_requested_but_missing_is_reported() {
    let inputs = ResolveInputs {
        params: params(Some("7"), None, None),
        metric: Lookup::Missing,
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());

    assert_eq!(resolution.setup_mode, SetupMode::Context);
    assert!(resolution.context.urns.is_empty());
    assert!(resolution.errors.contains("Could not find metricId 7"));
}

#[test]
fn metric_record_without_id_is_ignored() {
    let inputs = ResolveInputs {
        metric: Lookup::Found(metric_record("1_HOURS", 1_500_000_000_000)),
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    assert_eq!(resolution.setup_mode, SetupMode::Context);
    assert!(resolution.errors.is_empty());
}

// ---------------------------------------------------------------------------
// Anomaly branch
// ---------------------------------------------------------------------------

#[test]
fn anomaly_builds_filtered_urns() {
    let inputs = ResolveInputs {
        params: params(None, Some("42"), None),
        anomaly: Lookup::Found(anomaly_record(true)),
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    let context = &resolution.context;

    let metric_urn = "thirdeye:metric:7:country%3DUS:country%3DUK";
    assert_eq!(context.urns, set(&[metric_urn]));
    assert_eq!(
        context.anomaly_urns,
        set(&[
            "thirdeye:event:anomaly:42",
            metric_urn,
            "frontend:anomalyfunction:3:country%3DUS:country%3DUK",
        ])
    );
    assert_eq!(
        context.anomaly_range,
        TimeRange::new(1_500_000_000_000, 1_500_003_600_000)
    );
    assert_eq!(context.analysis_range, TimeRange::new(JUL_14 - DAY, JUL_14 + DAY));
    assert_eq!(context.granularity, Granularity::new(5, TimeUnit::Minutes));
    assert_eq!(context.compare_mode, "WoW");

    assert_eq!(resolution.setup_mode, SetupMode::Selected);
    assert_eq!(
        resolution.session.selected_urns,
        set(&["thirdeye:event:anomaly:42", metric_urn])
    );
    assert_eq!(
        resolution.session.name,
        "New Investigation of #42 (Jul 14, 2017 02:40 am)"
    );
    assert_eq!(resolution.session.text, "checkout drop");
    assert_eq!(resolution.session.owner, "alice");
    assert_eq!(resolution.size_metric_urns, set(&[metric_urn]));
}

#[test]
fn anomaly_without_function_has_two_anomaly_urns() {
    let inputs = ResolveInputs {
        params: params(None, Some("42"), None),
        anomaly: Lookup::Found(anomaly_record(false)),
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    assert_eq!(resolution.context.anomaly_urns.len(), 2);
}

#[test]
fn anomaly_overrides_metric() {
    let inputs = ResolveInputs {
        params: params(Some("7"), Some("42"), None),
        metric: Lookup::Found(metric_record("1_HOURS", 1_500_000_000_000)),
        anomaly: Lookup::Found(anomaly_record(false)),
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    assert_eq!(
        resolution.context.urns,
        set(&["thirdeye:metric:7:country%3DUS:country%3DUK"])
    );
    assert!(resolution.session.name.starts_with("New Investigation of #42"));
}

#[test]
fn missing_anomaly_keeps_metric_context() {
    let inputs = ResolveInputs {
        params: params(Some("7"), Some("42"), None),
        metric: Lookup::Found(metric_record("1_HOURS", 1_500_000_000_000)),
        anomaly: Lookup::Missing,
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    assert_eq!(resolution.context.urns, set(&["thirdeye:metric:7"]));
    assert_eq!(resolution.setup_mode, SetupMode::Selected);
    assert_eq!(
        resolution.errors.iter().collect::<Vec<_>>(),
        vec!["Could not find anomalyId 42"]
    );
}

// ---------------------------------------------------------------------------
// Session branch and recovery
// ---------------------------------------------------------------------------

#[test]
fn session_overrides_anomaly() {
    let inputs = ResolveInputs {
        params: params(None, Some("42"), Some("s1")),
        anomaly: Lookup::Found(anomaly_record(true)),
        session: Lookup::Found(session_record("s1", 500)),
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    let context = &resolution.context;

    assert_eq!(
        context.urns,
        set(&["thirdeye:metric:9", "thirdeye:event:anomaly:42"])
    );
    assert_eq!(context.anomaly_range, TimeRange::new(10, 20));
    assert_eq!(context.analysis_range, TimeRange::new(0, 30));
    assert_eq!(context.granularity, Granularity::new(15, TimeUnit::Minutes));
    assert_eq!(context.compare_mode, "Wo2W");
    assert_eq!(context.anomaly_urns, set(&["thirdeye:event:anomaly:42"]));

    let session = &resolution.session;
    assert_eq!(session.name, "Saved s1");
    assert_eq!(session.text, "notes");
    assert_eq!(session.owner, "bob");
    assert_eq!(session.permissions, "READ");
    assert_eq!(session.updated_by, "carol");
    assert_eq!(session.updated_time, Some(500));
    assert!(!session.modified);
    assert_eq!(session.selected_urns, set(&["thirdeye:metric:9"]));

    assert_eq!(resolution.setup_mode, SetupMode::None);
    assert_eq!(resolution.size_metric_urns, set(&["thirdeye:metric:9"]));
    assert_eq!(resolution.redirect, None);
}

#[test]
fn missing_session_is_reported() {
    let inputs = ResolveInputs {
        params: params(None, None, Some("s9")),
        session: Lookup::Missing,
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    assert_eq!(resolution.setup_mode, SetupMode::Context);
    assert!(resolution.errors.contains("Could not find sessionId s9"));
}

#[test]
fn anomaly_sessions_trigger_recovery() {
    let inputs = ResolveInputs {
        params: params(None, Some("42"), None),
        anomaly: Lookup::Found(anomaly_record(true)),
        anomaly_sessions: vec![
            session_record("a", 100),
            session_record("b", 300),
            session_record("c", 200),
        ],
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());

    assert_eq!(
        resolution.redirect,
        Some(Redirect {
            session_id: "b".to_string(),
            anomaly_id: None,
        })
    );
    assert_eq!(resolution.params, params(None, None, Some("b")));
    assert_eq!(resolution.setup_mode, SetupMode::None);
    assert_eq!(resolution.session.name, "Saved b");
    assert_eq!(resolution.session.updated_time, Some(300));
    assert!(resolution.errors.is_empty());
}

#[test]
fn recovery_replaces_an_explicit_session() {
    let inputs = ResolveInputs {
        params: params(None, Some("42"), Some("old")),
        session: Lookup::Missing,
        anomaly_sessions: vec![session_record("fresh", 900)],
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &now(), &settings());
    assert_eq!(resolution.params.session_id.as_deref(), Some("fresh"));
    assert_eq!(resolution.session.name, "Saved fresh");
    assert!(resolution.errors.is_empty());
}

#[test]
fn all_sources_missing_still_yield_defaults() {
    let inputs = ResolveInputs {
        params: params(Some("7"), Some("42"), Some("s1")),
        metric: Lookup::Missing,
        anomaly: Lookup::Missing,
        session: Lookup::Missing,
        anomaly_sessions: Vec::new(),
    };

    let resolution = resolve(inputs, &now(), &settings());
    assert_eq!(resolution.setup_mode, SetupMode::Context);
    assert_eq!(resolution.context.granularity, Granularity::ONE_HOUR);
    assert_eq!(resolution.errors.len(), 3);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn resolving_twice_is_identical() {
    let inputs = ResolveInputs {
        params: params(Some("7"), Some("42"), None),
        metric: Lookup::Found(metric_record("1_DAYS", 1_500_000_000_000)),
        anomaly: Lookup::Found(anomaly_record(true)),
        ..ResolveInputs::default()
    };

    let first = resolve(inputs.clone(), &now(), &settings());
    let second = resolve(inputs, &now(), &settings());
    assert_eq!(first, second);
}

#[test]
fn reference_zone_moves_day_boundaries() {
    // UTC+10: 02:40Z is 12:40 local, so local midnight is 14:00Z the day before.
    let zone = FixedOffset::east_opt(10 * 3600).unwrap();
    let local_now = now().with_timezone(&zone);
    let inputs = ResolveInputs {
        params: params(None, Some("42"), None),
        anomaly: Lookup::Found(anomaly_record(false)),
        ..ResolveInputs::default()
    };

    let resolution = resolve(inputs, &local_now, &settings());

    let local_midnight = JUL_14 - 10 * 60 * MINUTE;
    assert_eq!(
        resolution.context.analysis_range,
        TimeRange::new(local_midnight - DAY, local_midnight + DAY)
    );
    assert_eq!(
        resolution.session.name,
        "New Investigation of #42 (Jul 14, 2017 12:40 pm)"
    );
}
