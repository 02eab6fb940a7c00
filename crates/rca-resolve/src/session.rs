//! Picks the saved session to reopen when an anomaly already has one.

use rca_core::records::SessionRecord;

use crate::params::Redirect;

/// The session with the greatest `updated` timestamp. On ties the later
/// entry in `sessions` wins.
#[must_use]
pub fn most_recent(sessions: &[SessionRecord]) -> Option<&SessionRecord> {
    sessions
        .iter()
        .reduce(|best, candidate| if candidate.updated >= best.updated { candidate } else { best })
}

/// Outcome of session auto-recovery for an anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub session: SessionRecord,
    pub redirect: Redirect,
}

/// Choose the session to reopen among those linked to an anomaly, if any.
#[must_use]
pub fn recover(anomaly_sessions: &[SessionRecord]) -> Option<Recovery> {
    most_recent(anomaly_sessions).map(|session| Recovery {
        redirect: Redirect {
            session_id: session.id.clone(),
            anomaly_id: None,
        },
        session: session.clone(),
    })
}
