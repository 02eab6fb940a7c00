//! Location of the record fixtures read by the file-backed record source.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> PathBuf {
    PathBuf::from("records")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordsConfig {
    /// Directory holding `metrics/`, `anomalies/`, and `sessions/`.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}
