use crate::cache::LogoCache;
use crate::domain::{Domain, DomainResolver, OrganizationKind};
use crate::provider::{ProviderCascade, ProviderTier};
use crate::resolution::machine::ResolutionMachine;

/// Shared configuration for every resolution: the domain heuristics and the
/// provider cascade. Cheap to borrow from many machines at once.
#[derive(Debug, Clone, Default)]
pub struct LogoService {
    resolver: DomainResolver,
    cascade: ProviderCascade,
}

impl LogoService {
    pub fn new(resolver: DomainResolver, cascade: ProviderCascade) -> Self {
        Self { resolver, cascade }
    }

    pub fn resolver(&self) -> &DomainResolver {
        &self.resolver
    }

    pub fn cascade(&self) -> &ProviderCascade {
        &self.cascade
    }

    pub fn domains(&self, kind: OrganizationKind, name: &str) -> Vec<Domain> {
        self.resolver.resolve_for(kind, name)
    }

    /// Every URL the cascade would try for `name`, in attempt order.
    pub fn plan(&self, kind: OrganizationKind, name: &str) -> Vec<(Domain, ProviderTier, String)> {
        let mut out = Vec::new();
        for domain in self.domains(kind, name) {
            for (tier, url) in self.cascade.urls_for(domain.as_str()) {
                out.push((domain.clone(), tier, url));
            }
        }
        out
    }

    pub fn machine<'a>(
        &'a self,
        cache: &'a dyn LogoCache,
        kind: OrganizationKind,
    ) -> ResolutionMachine<'a> {
        ResolutionMachine::new(self, cache, kind)
    }
}
