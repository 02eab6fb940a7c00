//! Addressable parameters of the root-cause screen.

use serde::{Deserialize, Serialize};

/// The screen's query parameters. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    pub metric_id: Option<String>,
    pub anomaly_id: Option<String>,
    pub session_id: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|id| !id.is_empty())
}

impl RouteParams {
    #[must_use]
    pub fn metric_id(&self) -> Option<&str> {
        present(self.metric_id.as_ref())
    }

    #[must_use]
    pub fn anomaly_id(&self) -> Option<&str> {
        present(self.anomaly_id.as_ref())
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        present(self.session_id.as_ref())
    }

    /// Whether moving from `previous` to `self` needs a fresh resolution pass.
    ///
    /// Metric and anomaly changes re-resolve; a session id change alone does
    /// not, since saving a session rewrites it in place.
    #[must_use]
    pub fn requires_refresh(&self, previous: &Self) -> bool {
        self.metric_id() != previous.metric_id() || self.anomaly_id() != previous.anomaly_id()
    }

    /// Parameters left behind when leaving the screen: the session id is
    /// dropped so it does not stick to the next visit.
    #[must_use]
    pub fn on_exit(self) -> Self {
        Self {
            session_id: None,
            ..self
        }
    }
}

/// Instruction to rewrite the screen's addressable state after session
/// auto-recovery. Applied by the caller, independent of the resolved state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub session_id: String,
    /// Always cleared by recovery; kept explicit so the instruction is complete.
    pub anomaly_id: Option<String>,
}

impl Redirect {
    /// Apply the redirect to `params`.
    #[must_use]
    pub fn apply(&self, params: &RouteParams) -> RouteParams {
        RouteParams {
            metric_id: params.metric_id.clone(),
            anomaly_id: self.anomaly_id.clone(),
            session_id: Some(self.session_id.clone()),
        }
    }
}
