//! Raw record shapes consumed by the resolver.
//!
//! Metric and anomaly entities arrive as generic entities whose attributes
//! are multi-valued string lists (`{"granularity": ["5_MINUTES"]}`). Sessions
//! arrive as flat camelCase objects. All three are fetched elsewhere; this
//! crate only describes their shape and exposes typed accessors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::granularity::Granularity;
use crate::serde_helpers::{epoch_millis, id_string, optional_id_string};

/// Multi-valued entity attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, Vec<String>>);

impl Attributes {
    /// All values recorded for `name`, empty when absent.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.0.get(name).map_or(&[], Vec::as_slice)
    }

    /// The first value recorded for `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    pub fn insert<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }
}

impl<K, V, S> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attributes = Self::default();
        for (name, values) in iter {
            attributes.insert(name, values);
        }
        attributes
    }
}

fn required<'a>(urn: &str, attributes: &'a Attributes, name: &str) -> Result<&'a str, CoreError> {
    attributes
        .first(name)
        .ok_or_else(|| CoreError::MissingAttribute {
            urn: urn.to_string(),
            attribute: name.to_string(),
        })
}

// ---------------------------------------------------------------------------
// MetricRecord
// ---------------------------------------------------------------------------

/// Metric metadata entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub urn: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl MetricRecord {
    /// Native granularity of the metric, not yet normalized.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] when the attribute is missing or malformed.
    pub fn granularity(&self) -> Result<Granularity, CoreError> {
        required(&self.urn, &self.attributes, "granularity")?.parse()
    }

    /// Latest observed timestamp in epoch millis.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] when the attribute is missing or not an integer.
    pub fn max_time(&self) -> Result<i64, CoreError> {
        let raw = required(&self.urn, &self.attributes, "maxTime")?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| CoreError::InvalidAttribute {
                urn: self.urn.clone(),
                attribute: "maxTime".to_string(),
                value: raw.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// AnomalyRecord
// ---------------------------------------------------------------------------

/// Detected anomaly event entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub urn: String,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    pub start: i64,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    pub end: i64,
    #[serde(default)]
    pub attributes: Attributes,
}

impl AnomalyRecord {
    /// Native granularity of the anomaly's metric, not yet normalized.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] when the attribute is missing or malformed.
    pub fn metric_granularity(&self) -> Result<Granularity, CoreError> {
        required(&self.urn, &self.attributes, "metricGranularity")?.parse()
    }

    /// # Errors
    ///
    /// Returns [`CoreError::MissingAttribute`] when no metric id is recorded.
    pub fn metric_id(&self) -> Result<&str, CoreError> {
        required(&self.urn, &self.attributes, "metricId")
    }

    #[must_use]
    pub fn function_id(&self) -> Option<&str> {
        self.attributes.first("functionId")
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.attributes.first("comment")
    }

    /// Dimension names with their explored values, in recorded order.
    pub fn dimensions(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .values("dimensions")
            .iter()
            .map(|name| (name.as_str(), self.attributes.values(name)))
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// A saved investigation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    pub owner: String,
    pub permissions: String,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    pub updated: i64,
    #[serde(default)]
    pub context_urns: Vec<String>,
    #[serde(default)]
    pub selected_urns: Vec<String>,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    pub anomaly_range_start: i64,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    pub anomaly_range_end: i64,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    pub analysis_range_start: i64,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    pub analysis_range_end: i64,
    pub granularity: String,
    pub compare_mode: String,
    #[serde(default)]
    pub anomaly_urns: Vec<String>,
    /// Anomaly the session was started from, if any.
    #[serde(default, deserialize_with = "optional_id_string")]
    pub anomaly_id: Option<String>,
}
