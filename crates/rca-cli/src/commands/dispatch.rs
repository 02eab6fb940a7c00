use rca_config::RcaConfig;

use crate::cli::{Commands, GlobalFlags};
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &RcaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Resolve(args) => commands::resolve::handle(&args, config, flags).await,
        Commands::Granularity(args) => commands::granularity::handle(&args, flags),
    }
}
