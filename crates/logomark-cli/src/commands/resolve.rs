use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{format_display, organization_kind};
use anyhow::{Context as _, Result};
use clap::Args;
use logomark_config::{MAX_PROBE_TIMEOUT_MS, MIN_PROBE_TIMEOUT_MS};
use logomark_core::time::now_millis;
use logomark_core::{LogoDisplay, ProviderTier, Step};
use logomark_probe::{resume, DriveReport, HttpProbe};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    pub name: String,
    #[arg(long)]
    pub institution: bool,
    /// Per-provider timeout, overriding probe.timeout_ms
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
struct AttemptDto {
    url: String,
    tier: ProviderTier,
    domain_index: usize,
    outcome: &'static str,
}

#[derive(Debug, Serialize)]
struct ResolveDto {
    name: String,
    display: LogoDisplay,
    cached: bool,
    attempts: Vec<AttemptDto>,
}

impl ResolveDto {
    fn new(name: String, report: DriveReport) -> Self {
        let cached = report.from_cache();
        let attempts = report
            .attempts
            .into_iter()
            .map(|attempt| AttemptDto {
                url: attempt.url,
                tier: attempt.tier,
                domain_index: attempt.domain_index,
                outcome: attempt.outcome.label(),
            })
            .collect();
        Self {
            name,
            display: report.display,
            cached,
            attempts,
        }
    }
}

pub fn resolve(ctx: &Context<'_>, args: ResolveArgs) -> Result<()> {
    let timeout_ms = match args.timeout_ms {
        Some(value) if !(MIN_PROBE_TIMEOUT_MS..=MAX_PROBE_TIMEOUT_MS).contains(&value) => {
            return Err(invalid_input(format!(
                "timeout must be between {} and {} ms",
                MIN_PROBE_TIMEOUT_MS, MAX_PROBE_TIMEOUT_MS
            )));
        }
        Some(value) => value,
        None => ctx.config.probe.timeout_ms,
    };
    let kind = organization_kind(args.institution);
    let mut machine = ctx.service.machine(ctx.cache, kind);
    // cache hits and unresolvable names settle here without any network
    let report = match machine.set_name(&args.name, now_millis()) {
        step @ Step::Load(_) => {
            let probe = HttpProbe::new(
                Duration::from_millis(timeout_ms),
                ctx.config.probe.user_agent.as_deref(),
            )
            .with_context(|| "create http probe")?;
            resume(&mut machine, &probe, step)
        }
        Step::Settled(display) => DriveReport::settled(display, machine.cache_hit()),
        Step::Ignored => DriveReport::settled(machine.display(), false),
    };
    debug!(
        attempts = report.attempts.len(),
        cached = report.from_cache(),
        "resolution settled"
    );

    if ctx.json {
        return print_json(&ResolveDto::new(args.name, report));
    }
    println!("{}", format_display(&report.display));
    Ok(())
}
