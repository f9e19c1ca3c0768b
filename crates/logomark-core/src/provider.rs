use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DOMAIN_PLACEHOLDER: &str = "{domain}";
pub const CLEARBIT_TEMPLATE: &str = "https://logo.clearbit.com/{domain}";
pub const UPLEAD_TEMPLATE: &str = "https://logo.uplead.com/{domain}";
pub const FAVICON_TEMPLATE: &str = "https://www.google.com/s2/favicons?domain={domain}&sz=128";
pub const MAX_TIERS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTier {
    Primary,
    Secondary,
    Tertiary,
    Exhausted,
}

impl ProviderTier {
    /// Advances strictly forward; `Exhausted` is absorbing.
    pub fn next(self) -> Self {
        match self {
            ProviderTier::Primary => ProviderTier::Secondary,
            ProviderTier::Secondary => ProviderTier::Tertiary,
            ProviderTier::Tertiary | ProviderTier::Exhausted => ProviderTier::Exhausted,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            ProviderTier::Primary => Some(0),
            ProviderTier::Secondary => Some(1),
            ProviderTier::Tertiary => Some(2),
            ProviderTier::Exhausted => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProviderTier::Primary => "primary",
            ProviderTier::Secondary => "secondary",
            ProviderTier::Tertiary => "tertiary",
            ProviderTier::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for ProviderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderTemplate(String);

impl ProviderTemplate {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if !trimmed.contains(DOMAIN_PLACEHOLDER) {
            return Err(CoreError::MissingDomainPlaceholder(trimmed.to_string()));
        }
        let lower = trimmed.to_ascii_lowercase();
        if !(lower.starts_with("https://") || lower.starts_with("http://")) {
            return Err(CoreError::InvalidTemplateScheme(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, domain: &str) -> String {
        self.0.replace(DOMAIN_PLACEHOLDER, domain)
    }
}

impl TryFrom<String> for ProviderTemplate {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<ProviderTemplate> for String {
    fn from(value: ProviderTemplate) -> Self {
        value.0
    }
}

/// Ordered logo providers tried for one domain candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCascade {
    templates: Vec<ProviderTemplate>,
}

impl Default for ProviderCascade {
    fn default() -> Self {
        Self {
            templates: vec![
                ProviderTemplate(CLEARBIT_TEMPLATE.to_string()),
                ProviderTemplate(UPLEAD_TEMPLATE.to_string()),
                ProviderTemplate(FAVICON_TEMPLATE.to_string()),
            ],
        }
    }
}

impl ProviderCascade {
    pub fn new(templates: Vec<ProviderTemplate>) -> Result<Self, CoreError> {
        if templates.is_empty() || templates.len() > MAX_TIERS {
            return Err(CoreError::InvalidTierCount(templates.len()));
        }
        Ok(Self { templates })
    }

    /// Keeps only the first `tiers` providers.
    pub fn truncated(mut self, tiers: usize) -> Result<Self, CoreError> {
        if tiers == 0 || tiers > self.templates.len() {
            return Err(CoreError::InvalidTierCount(tiers));
        }
        self.templates.truncate(tiers);
        Ok(self)
    }

    pub fn tier_count(&self) -> usize {
        self.templates.len()
    }

    pub fn templates(&self) -> &[ProviderTemplate] {
        &self.templates
    }

    pub fn first_tier(&self) -> ProviderTier {
        ProviderTier::Primary
    }

    /// Tier following `tier`, or `Exhausted` past the configured count.
    pub fn next_tier(&self, tier: ProviderTier) -> ProviderTier {
        let next = tier.next();
        match next.index() {
            Some(index) if index < self.templates.len() => next,
            _ => ProviderTier::Exhausted,
        }
    }

    pub fn build_provider_url(&self, domain: &str, tier: ProviderTier) -> Option<String> {
        let index = tier.index()?;
        self.templates
            .get(index)
            .map(|template| template.render(domain))
    }

    pub fn urls_for(&self, domain: &str) -> Vec<(ProviderTier, String)> {
        let mut out = Vec::with_capacity(self.templates.len());
        let mut tier = self.first_tier();
        while let Some(url) = self.build_provider_url(domain, tier) {
            out.push((tier, url));
            tier = self.next_tier(tier);
        }
        out
    }
}

/// URL for `tier` using the default three-provider cascade.
pub fn build_provider_url(domain: &str, tier: ProviderTier) -> Option<String> {
    ProviderCascade::default().build_provider_url(domain, tier)
}
