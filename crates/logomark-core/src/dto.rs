use crate::cache::CacheEntry;
use crate::domain::{Domain, NormalizedKey};
use crate::provider::ProviderTier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryDto {
    pub key: String,
    pub url: Option<String>,
    pub timestamp: i64,
    pub fresh: bool,
}

impl CacheEntryDto {
    pub fn new(key: &NormalizedKey, entry: &CacheEntry, now: i64, ttl_millis: i64) -> Self {
        Self {
            key: key.as_str().to_string(),
            url: entry.url.clone(),
            timestamp: entry.timestamp,
            fresh: entry.is_fresh(now, ttl_millis),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItemDto {
    pub domain: String,
    pub tier: ProviderTier,
    pub url: String,
}

impl PlanItemDto {
    pub fn new(domain: &Domain, tier: ProviderTier, url: String) -> Self {
        Self {
            domain: domain.value.clone(),
            tier,
            url,
        }
    }
}
