//! Concurrent record loading ahead of resolution.
//!
//! The four lookups are independent: each runs only if its id is present,
//! all run concurrently, and resolution starts once every one has settled.
//! A failing lookup is logged and treated as absent. It never fails the
//! others.

use std::future::Future;

use rca_core::records::{AnomalyRecord, MetricRecord, SessionRecord};

use crate::error::SourceError;
use crate::params::RouteParams;
use crate::resolver::{Lookup, ResolveInputs};

/// Where metric, anomaly, and session records come from.
///
/// `Ok(None)` means the id resolved to nothing.
pub trait RecordSource {
    fn fetch_metric(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<MetricRecord>, SourceError>> + Send;

    fn fetch_anomaly(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<AnomalyRecord>, SourceError>> + Send;

    /// Saved sessions that were started from the given anomaly.
    fn fetch_anomaly_sessions(
        &self,
        anomaly_id: &str,
    ) -> impl Future<Output = Result<Vec<SessionRecord>, SourceError>> + Send;

    fn fetch_session(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<SessionRecord>, SourceError>> + Send;
}

fn settle<T>(kind: &str, id: &str, result: Result<Option<T>, SourceError>) -> Lookup<T> {
    match result {
        Ok(record) => Lookup::fetched(record),
        Err(e) => {
            tracing::warn!(kind, id, %e, "record fetch failed, treating as absent");
            Lookup::Missing
        }
    }
}

/// Fetch every record `params` asks for and bundle them for resolution.
pub async fn load_inputs<S: RecordSource>(source: &S, params: &RouteParams) -> ResolveInputs {
    let metric = async {
        match params.metric_id() {
            Some(id) => settle("metric", id, source.fetch_metric(id).await),
            None => Lookup::NotRequested,
        }
    };
    let anomaly = async {
        match params.anomaly_id() {
            Some(id) => settle("anomaly", id, source.fetch_anomaly(id).await),
            None => Lookup::NotRequested,
        }
    };
    let anomaly_sessions = async {
        match params.anomaly_id() {
            Some(id) => source.fetch_anomaly_sessions(id).await.unwrap_or_else(|e| {
                tracing::warn!(anomaly_id = id, %e, "anomaly session query failed");
                Vec::new()
            }),
            None => Vec::new(),
        }
    };
    let session = async {
        match params.session_id() {
            Some(id) => settle("session", id, source.fetch_session(id).await),
            None => Lookup::NotRequested,
        }
    };

    let (metric, anomaly, anomaly_sessions, session) =
        tokio::join!(metric, anomaly, anomaly_sessions, session);

    ResolveInputs {
        params: params.clone(),
        metric,
        anomaly,
        anomaly_sessions,
        session,
    }
}
