//! URN prefix constants and formatting helpers.
//!
//! URNs are colon-separated identifiers. Filtered URNs append one
//! percent-encoded `<dimension>=<value>` term per filter, in insertion order:
//!
//! ```text
//! thirdeye:metric:7:country%3DUS:country%3DUK
//! ```

use std::collections::BTreeSet;

pub const METRIC_PREFIX: &str = "thirdeye:metric:";
pub const ANOMALY_PREFIX: &str = "thirdeye:event:anomaly:";
pub const FUNCTION_PREFIX: &str = "frontend:anomalyfunction:";
pub const CURRENT_METRIC_PREFIX: &str = "frontend:metric:current:";
pub const BASELINE_METRIC_PREFIX: &str = "frontend:metric:baseline:";

#[must_use]
pub fn metric(id: &str) -> String {
    format!("{METRIC_PREFIX}{id}")
}

#[must_use]
pub fn anomaly(id: &str) -> String {
    format!("{ANOMALY_PREFIX}{id}")
}

#[must_use]
pub fn function(id: &str) -> String {
    format!("{FUNCTION_PREFIX}{id}")
}

/// Current-window view of a metric URN. Non-metric URNs are returned as-is.
#[must_use]
pub fn to_current(metric_urn: &str) -> String {
    rebase_metric(metric_urn, CURRENT_METRIC_PREFIX)
}

/// Baseline-window view of a metric URN. Non-metric URNs are returned as-is.
#[must_use]
pub fn to_baseline(metric_urn: &str) -> String {
    rebase_metric(metric_urn, BASELINE_METRIC_PREFIX)
}

fn rebase_metric(metric_urn: &str, prefix: &str) -> String {
    metric_urn
        .strip_prefix(METRIC_PREFIX)
        .map_or_else(|| metric_urn.to_string(), |tail| format!("{prefix}{tail}"))
}

/// Render a single filter term.
#[must_use]
pub fn filter_term(dimension: &str, value: &str) -> String {
    urlencoding::encode(&format!("{dimension}={value}")).into_owned()
}

/// The subset of `urns` starting with `prefix`.
#[must_use]
pub fn filter_prefix<'a, I>(urns: I, prefix: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    urns.into_iter()
        .filter(|urn| urn.starts_with(prefix))
        .cloned()
        .collect()
}

/// Append-only builder for a filtered URN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredUrn {
    terms: Vec<String>,
}

impl FilteredUrn {
    #[must_use]
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn push(&mut self, dimension: &str, value: &str) {
        self.terms.push(filter_term(dimension, value));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Join `base` with every filter term pushed so far.
    #[must_use]
    pub fn apply(&self, base: &str) -> String {
        std::iter::once(base)
            .chain(self.terms.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(":")
    }
}
