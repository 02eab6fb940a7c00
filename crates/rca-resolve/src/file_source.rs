//! Record source backed by JSON files on disk.
//!
//! ```text
//! <root>/metrics/<id>.json
//! <root>/anomalies/<id>.json
//! <root>/sessions/<id>.json
//! ```
//!
//! A missing file means the id did not resolve. Anomaly-linked sessions are
//! the session files whose `anomalyId` matches; unreadable files in that scan
//! are skipped.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rca_core::records::{AnomalyRecord, MetricRecord, SessionRecord};
use serde::de::DeserializeOwned;

use crate::error::SourceError;
use crate::source::RecordSource;

#[derive(Debug, Clone)]
pub struct FileRecordSource {
    root: PathBuf,
}

impl FileRecordSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join(kind).join(format!("{id}.json"))
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SourceError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SourceError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && id != "." && id != ".."
}

impl RecordSource for FileRecordSource {
    async fn fetch_metric(&self, id: &str) -> Result<Option<MetricRecord>, SourceError> {
        if !valid_id(id) {
            return Ok(None);
        }
        read_json(&self.record_path("metrics", id)).await
    }

    async fn fetch_anomaly(&self, id: &str) -> Result<Option<AnomalyRecord>, SourceError> {
        if !valid_id(id) {
            return Ok(None);
        }
        read_json(&self.record_path("anomalies", id)).await
    }

    async fn fetch_anomaly_sessions(
        &self,
        anomaly_id: &str,
    ) -> Result<Vec<SessionRecord>, SourceError> {
        let dir = self.root.join("sessions");
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(SourceError::Io { path: dir, source }),
        };

        let mut paths = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if path.extension().is_some_and(|ext| ext == "json") {
                        paths.push(path);
                    }
                }
                Ok(None) => break,
                Err(source) => return Err(SourceError::Io { path: dir, source }),
            }
        }
        // Directory order is platform-dependent; tie-breaking needs a stable order.
        paths.sort();

        let mut sessions = Vec::new();
        for path in paths {
            let session = match read_json::<SessionRecord>(&path).await {
                Ok(Some(session)) => session,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(%e, "skipping unreadable session record");
                    continue;
                }
            };
            if session.anomaly_id.as_deref() == Some(anomaly_id) {
                sessions.push(session);
            }
        }
        Ok(sessions)
    }

    async fn fetch_session(&self, id: &str) -> Result<Option<SessionRecord>, SourceError> {
        if !valid_id(id) {
            return Ok(None);
        }
        read_json(&self.record_path("sessions", id)).await
    }
}
