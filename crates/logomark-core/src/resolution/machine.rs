use crate::cache::LogoCache;
use crate::domain::{Domain, NormalizedKey, OrganizationKind};
use crate::fallback::FallbackBadge;
use crate::provider::ProviderTier;
use crate::resolution::service::LogoService;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResolutionState {
    Idle,
    Attempting {
        tier: ProviderTier,
        domain_index: usize,
        url: String,
    },
    Resolved {
        url: String,
    },
    Exhausted,
}

impl ResolutionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolutionState::Resolved { .. } | ResolutionState::Exhausted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogoDisplay {
    Image { url: String },
    Fallback(FallbackBadge),
}

impl LogoDisplay {
    pub fn image_url(&self) -> Option<&str> {
        match self {
            LogoDisplay::Image { url } => Some(url),
            LogoDisplay::Fallback(_) => None,
        }
    }
}

/// Issued with every image attempt; hand it back with the load outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTicket {
    pub generation: u64,
    pub url: String,
    pub tier: ProviderTier,
    pub domain_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Load this URL and report back with the ticket.
    Load(AttemptTicket),
    /// Terminal state reached; nothing further to load.
    Settled(LogoDisplay),
    /// The callback belonged to an abandoned attempt.
    Ignored,
}

/// Per-consumer resolution state.
///
/// Walks the provider cascade for each domain candidate, writes terminal
/// outcomes to the shared cache and never surfaces an error: total failure
/// ends in [`ResolutionState::Exhausted`], rendered as a fallback badge.
///
/// Staleness is tracked with a generation counter. Each attempt, name
/// change and unmount bumps it, so a ticket from an older attempt is
/// rejected with [`Step::Ignored`] without touching state or cache.
pub struct ResolutionMachine<'a> {
    service: &'a LogoService,
    cache: &'a dyn LogoCache,
    kind: OrganizationKind,
    name: String,
    key: NormalizedKey,
    candidates: Vec<Domain>,
    state: ResolutionState,
    generation: u64,
    cache_hit: bool,
}

impl<'a> ResolutionMachine<'a> {
    pub fn new(service: &'a LogoService, cache: &'a dyn LogoCache, kind: OrganizationKind) -> Self {
        Self {
            service,
            cache,
            kind,
            name: String::new(),
            key: NormalizedKey::new(""),
            candidates: Vec::new(),
            state: ResolutionState::Idle,
            generation: 0,
            cache_hit: false,
        }
    }

    pub fn kind(&self) -> OrganizationKind {
        self.kind
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    pub fn key(&self) -> &NormalizedKey {
        &self.key
    }

    pub fn candidates(&self) -> &[Domain] {
        &self.candidates
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when the current name was settled by a fresh cache entry.
    pub fn cache_hit(&self) -> bool {
        self.cache_hit
    }

    /// Starts resolving `name`, abandoning any attempt in flight.
    pub fn set_name(&mut self, name: &str, now: i64) -> Step {
        self.generation += 1;
        self.name = name.to_string();
        self.key = NormalizedKey::new(name);
        self.candidates.clear();
        self.cache_hit = false;

        if self.key.is_empty() {
            debug!("empty organization name, using fallback");
            return self.settle_without_cache();
        }

        if let Some(entry) = self.cache.get_at(&self.key, now) {
            debug!(key = %self.key, negative = entry.is_negative(), "logo cache hit");
            self.cache_hit = true;
            self.state = match entry.url {
                Some(url) => ResolutionState::Resolved { url },
                None => ResolutionState::Exhausted,
            };
            return Step::Settled(self.display());
        }

        self.candidates = self.service.domains(self.kind, name);
        if self.candidates.is_empty() {
            debug!(key = %self.key, "no domain candidates, using fallback");
            return self.settle_without_cache();
        }
        self.begin_attempt(0, ProviderTier::Primary, now)
    }

    pub fn on_load(&mut self, ticket: &AttemptTicket, now: i64) -> Step {
        if !self.is_current(ticket) {
            debug!(url = %ticket.url, "ignoring stale load");
            return Step::Ignored;
        }
        debug!(key = %self.key, url = %ticket.url, tier = %ticket.tier, "logo resolved");
        self.state = ResolutionState::Resolved {
            url: ticket.url.clone(),
        };
        self.cache.set_at(&self.key, Some(&ticket.url), now);
        Step::Settled(self.display())
    }

    pub fn on_error(&mut self, ticket: &AttemptTicket, now: i64) -> Step {
        if !self.is_current(ticket) {
            debug!(url = %ticket.url, "ignoring stale error");
            return Step::Ignored;
        }
        debug!(key = %self.key, url = %ticket.url, tier = %ticket.tier, "logo provider miss");
        self.advance(ticket, now)
    }

    /// A provider that never answered is treated like one that failed.
    pub fn on_timeout(&mut self, ticket: &AttemptTicket, now: i64) -> Step {
        if !self.is_current(ticket) {
            debug!(url = %ticket.url, "ignoring stale timeout");
            return Step::Ignored;
        }
        debug!(key = %self.key, url = %ticket.url, tier = %ticket.tier, "logo provider timed out");
        self.advance(ticket, now)
    }

    /// Abandons local state; cache writes already made are kept.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.state = ResolutionState::Idle;
        self.candidates.clear();
        self.cache_hit = false;
    }

    pub fn display(&self) -> LogoDisplay {
        match &self.state {
            ResolutionState::Attempting { url, .. } | ResolutionState::Resolved { url } => {
                LogoDisplay::Image { url: url.clone() }
            }
            ResolutionState::Idle | ResolutionState::Exhausted => {
                LogoDisplay::Fallback(FallbackBadge::for_name(self.kind, &self.name))
            }
        }
    }

    pub fn current_ticket(&self) -> Option<AttemptTicket> {
        match &self.state {
            ResolutionState::Attempting {
                tier,
                domain_index,
                url,
            } => Some(AttemptTicket {
                generation: self.generation,
                url: url.clone(),
                tier: *tier,
                domain_index: *domain_index,
            }),
            _ => None,
        }
    }

    fn is_current(&self, ticket: &AttemptTicket) -> bool {
        ticket.generation == self.generation
            && matches!(self.state, ResolutionState::Attempting { .. })
    }

    fn advance(&mut self, ticket: &AttemptTicket, now: i64) -> Step {
        let next = self.service.cascade().next_tier(ticket.tier);
        if next != ProviderTier::Exhausted {
            return self.begin_attempt(ticket.domain_index, next, now);
        }
        let next_domain = ticket.domain_index + 1;
        if next_domain < self.candidates.len() {
            debug!(
                key = %self.key,
                domain = %self.candidates[next_domain],
                "retrying cascade with next domain candidate"
            );
            return self.begin_attempt(next_domain, ProviderTier::Primary, now);
        }
        self.exhaust(now)
    }

    fn begin_attempt(&mut self, domain_index: usize, tier: ProviderTier, now: i64) -> Step {
        let url = match self.candidates.get(domain_index) {
            Some(domain) => self
                .service
                .cascade()
                .build_provider_url(domain.as_str(), tier),
            None => None,
        };
        let Some(url) = url else {
            return self.exhaust(now);
        };

        self.generation += 1;
        self.state = ResolutionState::Attempting {
            tier,
            domain_index,
            url: url.clone(),
        };
        Step::Load(AttemptTicket {
            generation: self.generation,
            url,
            tier,
            domain_index,
        })
    }

    fn exhaust(&mut self, now: i64) -> Step {
        debug!(key = %self.key, "all logo providers exhausted");
        self.state = ResolutionState::Exhausted;
        self.cache.set_at(&self.key, None, now);
        Step::Settled(self.display())
    }

    fn settle_without_cache(&mut self) -> Step {
        self.state = ResolutionState::Exhausted;
        Step::Settled(self.display())
    }
}
