use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Resolve the investigation context for a metric, anomaly, or session.
    Resolve(ResolveArgs),
    /// Normalize a `<count>_<UNIT>` granularity token.
    Granularity(GranularityArgs),
}

/// Arguments for `rca resolve`.
#[derive(Clone, Debug, Args)]
pub struct ResolveArgs {
    /// Metric to seed the investigation from.
    #[arg(long)]
    pub metric_id: Option<String>,

    /// Anomaly to seed the investigation from.
    #[arg(long)]
    pub anomaly_id: Option<String>,

    /// Saved session to reopen.
    #[arg(long)]
    pub session_id: Option<String>,

    /// Record fixture directory (overrides `records.dir`).
    #[arg(long)]
    pub records: Option<PathBuf>,

    /// Evaluation time as RFC 3339 (defaults to the current time).
    #[arg(long)]
    pub now: Option<String>,

    /// Owner for new investigations (overrides `session.owner`).
    #[arg(long)]
    pub owner: Option<String>,
}

/// Arguments for `rca granularity`.
#[derive(Clone, Debug, Args)]
pub struct GranularityArgs {
    /// Raw token, e.g. `30_SECONDS`.
    pub token: String,
}
