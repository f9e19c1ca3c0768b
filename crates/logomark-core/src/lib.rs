pub mod cache;
pub mod domain;
pub mod dto;
pub mod error;
pub mod fallback;
pub mod provider;
pub mod resolution;
pub mod time;

pub use cache::{CacheEntry, LogoCache, MemoryCache};
pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use fallback::{FallbackBadge, FallbackIcon};
pub use provider::{build_provider_url, ProviderCascade, ProviderTemplate, ProviderTier};
pub use resolution::*;
