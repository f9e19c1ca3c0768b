use crate::source::{ImageProbe, ProbeOutcome};
use logomark_core::time::now_millis;
use logomark_core::{LogoDisplay, ProviderTier, ResolutionMachine, Step};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub url: String,
    pub tier: ProviderTier,
    pub domain_index: usize,
    pub outcome: ProbeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveReport {
    pub display: LogoDisplay,
    pub attempts: Vec<AttemptRecord>,
    /// Settled by a fresh cache entry without probing.
    pub cached: bool,
}

impl DriveReport {
    /// A report for a machine that settled without any image attempt.
    pub fn settled(display: LogoDisplay, cached: bool) -> Self {
        Self {
            display,
            attempts: Vec::new(),
            cached,
        }
    }

    pub fn from_cache(&self) -> bool {
        self.cached
    }
}

/// Resolves `name` to a terminal display, probing each candidate in turn.
pub fn drive<P: ImageProbe>(
    machine: &mut ResolutionMachine<'_>,
    probe: &P,
    name: &str,
) -> DriveReport {
    drive_with_clock(machine, probe, name, now_millis)
}

pub fn drive_with_clock<P, C>(
    machine: &mut ResolutionMachine<'_>,
    probe: &P,
    name: &str,
    mut clock: C,
) -> DriveReport
where
    P: ImageProbe,
    C: FnMut() -> i64,
{
    let step = machine.set_name(name, clock());
    resume_with_clock(machine, probe, step, clock)
}

/// Carries on from a step the machine already returned. A settled step
/// never touches `probe`.
pub fn resume<P: ImageProbe>(
    machine: &mut ResolutionMachine<'_>,
    probe: &P,
    step: Step,
) -> DriveReport {
    resume_with_clock(machine, probe, step, now_millis)
}

pub fn resume_with_clock<P, C>(
    machine: &mut ResolutionMachine<'_>,
    probe: &P,
    mut step: Step,
    mut clock: C,
) -> DriveReport
where
    P: ImageProbe,
    C: FnMut() -> i64,
{
    let mut attempts = Vec::new();
    loop {
        match step {
            Step::Load(ticket) => {
                let outcome = probe.probe(&ticket.url);
                debug!(
                    probe = probe.probe_name(),
                    url = %ticket.url,
                    tier = %ticket.tier,
                    outcome = outcome.label(),
                    "probed logo candidate"
                );
                attempts.push(AttemptRecord {
                    url: ticket.url.clone(),
                    tier: ticket.tier,
                    domain_index: ticket.domain_index,
                    outcome,
                });
                let now = clock();
                step = match outcome {
                    ProbeOutcome::Loaded => machine.on_load(&ticket, now),
                    ProbeOutcome::Failed => machine.on_error(&ticket, now),
                    ProbeOutcome::TimedOut => machine.on_timeout(&ticket, now),
                };
            }
            Step::Settled(display) => {
                return DriveReport {
                    display,
                    attempts,
                    cached: machine.cache_hit(),
                }
            }
            // only reachable if the machine was reset underneath us
            Step::Ignored => {
                return DriveReport {
                    display: machine.display(),
                    attempts,
                    cached: false,
                }
            }
        }
    }
}
