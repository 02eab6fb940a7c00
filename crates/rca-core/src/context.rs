//! The resolved investigation state handed to the root-cause screen.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::granularity::Granularity;
use crate::urn;

/// Half-open window of epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

/// Time ranges, granularity, compare mode, and entity selection driving a
/// root-cause analysis view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub urns: BTreeSet<String>,
    pub anomaly_range: TimeRange,
    pub analysis_range: TimeRange,
    #[schemars(with = "String")]
    pub granularity: Granularity,
    pub compare_mode: String,
    pub anomaly_urns: BTreeSet<String>,
}

impl Context {
    /// Context URNs that reference metrics. Derived on demand, never stored.
    #[must_use]
    pub fn size_metric_urns(&self) -> BTreeSet<String> {
        urn::filter_prefix(&self.urns, urn::METRIC_PREFIX)
    }
}

// ---------------------------------------------------------------------------
// SetupMode
// ---------------------------------------------------------------------------

/// Which precedence branch produced the final context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SetupMode {
    /// Defaults only; the user still has to pick a context.
    Context,
    /// Seeded from a metric or an anomaly with a pre-populated selection.
    Selected,
    /// Fully restored from a saved session.
    None,
}

impl SetupMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Context => "context",
            Self::Selected => "selected",
            Self::None => "none",
        }
    }
}

impl fmt::Display for SetupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionMeta
// ---------------------------------------------------------------------------

/// Investigation session metadata shown alongside the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    pub name: String,
    pub text: String,
    pub owner: String,
    pub permissions: String,
    pub updated_by: String,
    /// Epoch millis of the last save; `None` for unsaved investigations.
    pub updated_time: Option<i64>,
    /// `false` only when loaded verbatim from a saved session.
    pub modified: bool,
    pub selected_urns: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// ResolutionErrors
// ---------------------------------------------------------------------------

/// Human-readable, non-fatal lookup failures collected during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ResolutionErrors(BTreeSet<String>);

impl ResolutionErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn record(&mut self, message: impl Into<String>) {
        self.0.insert(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.0.contains(message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
