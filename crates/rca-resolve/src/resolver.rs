//! Resolves the root-cause screen's context from its initialization sources.
//!
//! Resolution is an ordered fold over full replacements:
//!
//! ```text
//! defaults → metric → anomaly → session
//! ```
//!
//! Each branch runs only when its id is present, and either replaces the
//! whole state or leaves the prior state untouched. Before the fold, session
//! auto-recovery may swap a requested anomaly for its most recently saved
//! session. Nothing here fails: lookup problems end up in
//! [`Resolution::errors`].

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use chrono::{DateTime, TimeZone};
use rca_config::RcaConfig;
use rca_core::context::{Context, ResolutionErrors, SessionMeta, SetupMode, TimeRange};
use rca_core::errors::CoreError;
use rca_core::granularity::{Granularity, TimeUnit};
use rca_core::records::{AnomalyRecord, MetricRecord, SessionRecord};
use rca_core::urn::{self, FilteredUrn};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::align::{at, floor_to_unit, shift};
use crate::error::BranchError;
use crate::granularity::normalize;
use crate::params::{Redirect, RouteParams};
use crate::range;
use crate::session::recover;

/// Compare mode of anomaly-seeded investigations.
pub const ANOMALY_COMPARE_MODE: &str = "WoW";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Outcome of fetching one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Lookup<T> {
    /// No id was supplied, so nothing was fetched.
    #[default]
    NotRequested,
    /// An id was supplied but no record came back.
    Missing,
    Found(T),
}

impl<T> Lookup<T> {
    /// `Found` for `Some`, `Missing` for `None`.
    #[must_use]
    pub fn fetched(record: Option<T>) -> Self {
        record.map_or(Self::Missing, Self::Found)
    }

    #[must_use]
    pub const fn found(&self) -> Option<&T> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotRequested | Self::Missing => None,
        }
    }
}

/// Everything fetched for one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveInputs {
    pub params: RouteParams,
    pub metric: Lookup<MetricRecord>,
    pub anomaly: Lookup<AnomalyRecord>,
    /// Saved sessions linked to the requested anomaly.
    pub anomaly_sessions: Vec<SessionRecord>,
    pub session: Lookup<SessionRecord>,
}

/// Values the default state and new sessions are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub compare_mode: String,
    pub date_format: String,
    pub owner: String,
    pub permissions: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from(&RcaConfig::default())
    }
}

impl From<&RcaConfig> for ResolverSettings {
    fn from(config: &RcaConfig) -> Self {
        Self {
            compare_mode: config.resolver.compare_mode.clone(),
            date_format: config.resolver.date_format.clone(),
            owner: config.session.owner.clone(),
            permissions: config.session.permissions.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Snapshot handed to the screen after a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// Parameters in effect after auto-recovery.
    pub params: RouteParams,
    pub context: Context,
    pub session: SessionMeta,
    pub setup_mode: SetupMode,
    pub errors: ResolutionErrors,
    /// Set when auto-recovery chose a saved session; the caller must rewrite
    /// its addressable state accordingly.
    pub redirect: Option<Redirect>,
    /// Context URNs that reference metrics.
    pub size_metric_urns: BTreeSet<String>,
}

/// State produced by one precedence branch.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seed {
    context: Context,
    session: SessionMeta,
    setup_mode: SetupMode,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve the context for one visit of the root-cause screen.
///
/// `now` supplies both the wall-clock time and the reference time zone for
/// every calendar operation; identical inputs give identical output.
pub fn resolve<Tz>(inputs: ResolveInputs, now: &DateTime<Tz>, settings: &ResolverSettings) -> Resolution
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let ResolveInputs {
        mut params,
        metric,
        mut anomaly,
        anomaly_sessions,
        mut session,
    } = inputs;

    let redirect = recover(&anomaly_sessions).map(|recovery| {
        info!(
            anomaly_id = params.anomaly_id().unwrap_or_default(),
            session_id = %recovery.redirect.session_id,
            "reopening most recent session for anomaly"
        );
        params = recovery.redirect.apply(&params);
        anomaly = Lookup::NotRequested;
        session = Lookup::Found(recovery.session);
        recovery.redirect
    });

    let tz = now.timezone();
    let stamp = format_stamp(now, &settings.date_format);
    let mut errors = ResolutionErrors::new();

    let seed = default_seed(now, settings, &stamp);
    let seed = overlay(seed, &mut errors, |prior| {
        metric_seed(&params, &metric, prior, &tz)
    });
    let seed = overlay(seed, &mut errors, |prior| {
        anomaly_seed(&params, &anomaly, prior, &tz, &stamp)
    });
    let seed = overlay(seed, &mut errors, |_| session_seed(&params, &session));

    let size_metric_urns = seed.context.size_metric_urns();
    Resolution {
        params,
        context: seed.context,
        session: seed.session,
        setup_mode: seed.setup_mode,
        errors,
        redirect,
        size_metric_urns,
    }
}

fn overlay<F>(prior: Seed, errors: &mut ResolutionErrors, branch: F) -> Seed
where
    F: FnOnce(&Seed) -> Result<Option<Seed>, BranchError>,
{
    match branch(&prior) {
        Ok(Some(next)) => next,
        Ok(None) => prior,
        Err(error) => {
            warn!(%error, "branch skipped, keeping prior context");
            errors.record(error.to_string());
            prior
        }
    }
}

fn format_stamp<Tz>(now: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut stamp = String::new();
    if write!(stamp, "{}", now.format(pattern)).is_ok() {
        return stamp;
    }
    warn!(pattern, "invalid session date format, falling back to RFC 3339");
    now.to_rfc3339()
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

fn default_seed<Tz: TimeZone>(now: &DateTime<Tz>, settings: &ResolverSettings, stamp: &str) -> Seed {
    // Only clocks at the edge of the calendar range hit the fallback.
    let offset = |from: &DateTime<Tz>, amount: i64, unit: TimeUnit| {
        shift(from, amount, unit)
            .unwrap_or_else(|| from.clone())
            .timestamp_millis()
    };

    let hour = floor_to_unit(now, TimeUnit::Hours);
    let day = floor_to_unit(now, TimeUnit::Days);

    Seed {
        context: Context {
            urns: BTreeSet::new(),
            anomaly_range: TimeRange::new(offset(&hour, -3, TimeUnit::Hours), hour.timestamp_millis()),
            analysis_range: TimeRange::new(
                offset(&day, -6, TimeUnit::Days),
                offset(&day, 1, TimeUnit::Days),
            ),
            granularity: Granularity::ONE_HOUR,
            compare_mode: settings.compare_mode.clone(),
            anomaly_urns: BTreeSet::new(),
        },
        session: SessionMeta {
            name: format!("New Investigation ({stamp})"),
            text: String::new(),
            owner: settings.owner.clone(),
            permissions: settings.permissions.clone(),
            updated_by: String::new(),
            updated_time: None,
            modified: true,
            selected_urns: BTreeSet::new(),
        },
        setup_mode: SetupMode::Context,
    }
}

fn metric_seed<Tz: TimeZone>(
    params: &RouteParams,
    metric: &Lookup<MetricRecord>,
    prior: &Seed,
    tz: &Tz,
) -> Result<Option<Seed>, BranchError> {
    const PARAM: &str = "metricId";

    let Some(id) = params.metric_id() else {
        return Ok(None);
    };
    let Some(record) = metric.found() else {
        return Err(BranchError::NotFound {
            param: PARAM,
            id: id.to_string(),
        });
    };
    let invalid = |source: CoreError| BranchError::Invalid {
        param: PARAM,
        id: id.to_string(),
        source,
    };
    let out_of_range = || BranchError::OutOfRange {
        param: PARAM,
        id: id.to_string(),
    };

    let granularity = normalize(record.granularity().map_err(invalid)?);
    let max_time = at(tz, record.max_time().map_err(invalid)?).ok_or_else(out_of_range)?;
    let anomaly_range = range::anomaly_range(&max_time, granularity).ok_or_else(out_of_range)?;
    let anomaly_end = at(tz, anomaly_range.end).ok_or_else(out_of_range)?;
    let analysis_range =
        range::analysis_range(&anomaly_end, &anomaly_end, granularity).ok_or_else(out_of_range)?;

    debug!(metric_id = id, %granularity, "metric branch applied");

    let metric_urn = urn::metric(id);
    Ok(Some(Seed {
        context: Context {
            urns: BTreeSet::from([metric_urn.clone()]),
            anomaly_range,
            analysis_range,
            // Daily metrics are charted hourly; the windows above keep the
            // daily offsets.
            granularity: if granularity == Granularity::ONE_DAY {
                Granularity::ONE_HOUR
            } else {
                granularity
            },
            compare_mode: prior.context.compare_mode.clone(),
            anomaly_urns: BTreeSet::new(),
        },
        session: SessionMeta {
            selected_urns: BTreeSet::from([
                urn::to_current(&metric_urn),
                urn::to_baseline(&metric_urn),
                metric_urn,
            ]),
            ..prior.session.clone()
        },
        setup_mode: SetupMode::Selected,
    }))
}

fn anomaly_seed<Tz: TimeZone>(
    params: &RouteParams,
    anomaly: &Lookup<AnomalyRecord>,
    prior: &Seed,
    tz: &Tz,
    stamp: &str,
) -> Result<Option<Seed>, BranchError> {
    const PARAM: &str = "anomalyId";

    let Some(id) = params.anomaly_id() else {
        return Ok(None);
    };
    let Some(record) = anomaly.found() else {
        return Err(BranchError::NotFound {
            param: PARAM,
            id: id.to_string(),
        });
    };
    let invalid = |source: CoreError| BranchError::Invalid {
        param: PARAM,
        id: id.to_string(),
        source,
    };
    let out_of_range = || BranchError::OutOfRange {
        param: PARAM,
        id: id.to_string(),
    };

    let granularity = normalize(record.metric_granularity().map_err(invalid)?);
    let anomaly_range = TimeRange::new(record.start, record.end);
    let analysis_range = range::analysis_range(
        &at(tz, record.start).ok_or_else(out_of_range)?,
        &at(tz, record.end).ok_or_else(out_of_range)?,
        granularity,
    )
    .ok_or_else(out_of_range)?;

    let mut filters = FilteredUrn::new();
    for (dimension, values) in record.dimensions() {
        for value in values {
            filters.push(dimension, value);
        }
    }

    let anomaly_urn = urn::anomaly(id);
    let metric_urn = filters.apply(&urn::metric(record.metric_id().map_err(invalid)?));
    let function_urn = record
        .function_id()
        .map(|function_id| filters.apply(&urn::function(function_id)));

    debug!(
        anomaly_id = id,
        %granularity,
        filters = filters.len(),
        "anomaly branch applied"
    );

    Ok(Some(Seed {
        context: Context {
            urns: BTreeSet::from([metric_urn.clone()]),
            anomaly_range,
            analysis_range,
            granularity,
            compare_mode: ANOMALY_COMPARE_MODE.to_string(),
            anomaly_urns: [anomaly_urn.clone(), metric_urn.clone()]
                .into_iter()
                .chain(function_urn)
                .collect(),
        },
        session: SessionMeta {
            name: format!("New Investigation of #{id} ({stamp})"),
            text: record.comment().unwrap_or_default().to_string(),
            selected_urns: BTreeSet::from([anomaly_urn, metric_urn]),
            ..prior.session.clone()
        },
        setup_mode: SetupMode::Selected,
    }))
}

fn session_seed(
    params: &RouteParams,
    session: &Lookup<SessionRecord>,
) -> Result<Option<Seed>, BranchError> {
    const PARAM: &str = "sessionId";

    let Some(id) = params.session_id() else {
        return Ok(None);
    };
    let Some(record) = session.found() else {
        return Err(BranchError::NotFound {
            param: PARAM,
            id: id.to_string(),
        });
    };

    let granularity = record
        .granularity
        .parse::<Granularity>()
        .map_err(|source| BranchError::Invalid {
            param: PARAM,
            id: id.to_string(),
            source,
        })?;

    debug!(session_id = id, "session branch applied");

    Ok(Some(Seed {
        context: Context {
            urns: record.context_urns.iter().cloned().collect(),
            anomaly_range: TimeRange::new(record.anomaly_range_start, record.anomaly_range_end),
            analysis_range: TimeRange::new(record.analysis_range_start, record.analysis_range_end),
            granularity,
            compare_mode: record.compare_mode.clone(),
            anomaly_urns: record.anomaly_urns.iter().cloned().collect(),
        },
        session: SessionMeta {
            name: record.name.clone(),
            text: record.text.clone().unwrap_or_default(),
            owner: record.owner.clone(),
            permissions: record.permissions.clone(),
            updated_by: record.updated_by.clone().unwrap_or_default(),
            updated_time: Some(record.updated),
            modified: false,
            selected_urns: record.selected_urns.iter().cloned().collect(),
        },
        setup_mode: SetupMode::None,
    }))
}
