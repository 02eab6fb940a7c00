use rca_resolve::granularity::normalize_token;
use serde::Serialize;

use crate::cli::{GlobalFlags, GranularityArgs};
use crate::output::output;

#[derive(Debug, Serialize)]
struct NormalizedGranularity {
    input: String,
    normalized: String,
}

/// Handle `rca granularity`.
pub fn handle(args: &GranularityArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = normalized(&args.token)?;
    output(&response, flags.format)
}

fn normalized(token: &str) -> anyhow::Result<NormalizedGranularity> {
    Ok(NormalizedGranularity {
        input: token.to_string(),
        normalized: normalize_token(token)?,
    })
}
