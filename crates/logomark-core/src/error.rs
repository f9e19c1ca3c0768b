use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("provider template must contain {{domain}}: {0}")]
    MissingDomainPlaceholder(String),
    #[error("provider template must use http or https: {0}")]
    InvalidTemplateScheme(String),
    #[error("provider cascade needs between 1 and 3 tiers, got {0}")]
    InvalidTierCount(usize),
    #[error("invalid known name: {0:?}")]
    InvalidKnownName(String),
    #[error("invalid known domain for {name}: {domain:?}")]
    InvalidKnownDomain { name: String, domain: String },
    #[error("invalid cache ttl: {0} ms")]
    InvalidTtl(i64),
}
