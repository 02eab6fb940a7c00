use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use rca_config::{RcaConfig, Zone};
use rca_resolve::{FileRecordSource, Resolution, ResolverSettings, RouteParams, load_inputs, resolve};

use crate::cli::{GlobalFlags, ResolveArgs};
use crate::output::output;

/// Handle `rca resolve`.
pub async fn handle(args: &ResolveArgs, config: &RcaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let resolution = run(args, config).await?;

    if !flags.quiet && !resolution.errors.is_empty() {
        for error in resolution.errors.iter() {
            eprintln!("warning: {error}");
        }
    }

    output(&resolution, flags.format)
}

async fn run(args: &ResolveArgs, config: &RcaConfig) -> anyhow::Result<Resolution> {
    let zone = config.resolver.zone()?;
    let now = parse_now(args.now.as_deref())?;

    let records = args
        .records
        .clone()
        .unwrap_or_else(|| config.records.dir.clone());
    tracing::debug!(records = %records.display(), "loading records");
    let source = FileRecordSource::new(records);

    let params = RouteParams {
        metric_id: args.metric_id.clone(),
        anomaly_id: args.anomaly_id.clone(),
        session_id: args.session_id.clone(),
    };
    let inputs = load_inputs(&source, &params).await;

    let mut settings = ResolverSettings::from(config);
    if let Some(owner) = &args.owner {
        settings.owner.clone_from(owner);
    }

    let resolution = match zone {
        Zone::Local => resolve(inputs, &now.with_timezone(&Local), &settings),
        Zone::Fixed(offset) => resolve(inputs, &now.with_timezone(&offset), &settings),
    };
    Ok(resolution)
}

fn parse_now(raw: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    raw.map_or_else(
        || Ok(Utc::now()),
        |value| {
            DateTime::parse_from_rfc3339(value)
                .map(|parsed| parsed.with_timezone(&Utc))
                .with_context(|| format!("invalid --now '{value}': expected RFC 3339"))
        },
    )
}
