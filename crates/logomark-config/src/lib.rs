use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use logomark_core::cache::DEFAULT_TTL_MINUTES;
use logomark_core::provider::{
    CLEARBIT_TEMPLATE, FAVICON_TEMPLATE, MAX_TIERS, UPLEAD_TEMPLATE,
};
use logomark_core::{CoreError, DomainResolver, LogoService, ProviderCascade, ProviderTemplate};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "logomark";
const CONFIG_FILENAME: &str = "config.toml";

pub const MAX_TTL_MINUTES: i64 = 7 * 24 * 60;
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 4_000;
pub const MIN_PROBE_TIMEOUT_MS: u64 = 100;
pub const MAX_PROBE_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub cascade: ProviderCascade,
    pub probe: ProbeConfig,
    pub resolver: DomainResolver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl_minutes: i64,
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub timeout_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig {
                ttl_minutes: DEFAULT_TTL_MINUTES,
                max_entries: None,
            },
            cascade: ProviderCascade::default(),
            probe: ProbeConfig {
                timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
                user_agent: None,
            },
            resolver: DomainResolver::new(),
        }
    }
}

impl AppConfig {
    pub fn service(&self) -> LogoService {
        LogoService::new(self.resolver.clone(), self.cascade.clone())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid cache.ttl_minutes value: {0}")]
    InvalidTtlMinutes(i64),
    #[error("invalid cache.max_entries value: {0}")]
    InvalidMaxEntries(usize),
    #[error("invalid providers.tiers value: {0}")]
    InvalidTierCount(usize),
    #[error("invalid providers.{tier} template: {source}")]
    InvalidProviderTemplate {
        tier: &'static str,
        #[source]
        source: CoreError,
    },
    #[error("invalid probe.timeout_ms value: {0}")]
    InvalidProbeTimeout(u64),
    #[error("probe.user_agent cannot be empty")]
    InvalidUserAgent,
    #[error("invalid known_names entry: {0}")]
    InvalidKnownName(#[source] CoreError),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    cache: Option<CacheFile>,
    providers: Option<ProvidersFile>,
    probe: Option<ProbeFile>,
    known_names: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CacheFile {
    ttl_minutes: Option<i64>,
    max_entries: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProvidersFile {
    tiers: Option<usize>,
    primary: Option<String>,
    secondary: Option<String>,
    tertiary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProbeFile {
    timeout_ms: Option<u64>,
    user_agent: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    // provider templates may carry API tokens
    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(cache) = parsed.cache {
        if let Some(ttl) = cache.ttl_minutes {
            if ttl <= 0 || ttl > MAX_TTL_MINUTES {
                return Err(ConfigError::InvalidTtlMinutes(ttl));
            }
            config.cache.ttl_minutes = ttl;
        }
        if let Some(max) = cache.max_entries {
            if max == 0 {
                return Err(ConfigError::InvalidMaxEntries(max));
            }
            config.cache.max_entries = Some(max);
        }
    }

    if let Some(providers) = parsed.providers {
        config.cascade = merge_providers(providers)?;
    }

    if let Some(probe) = parsed.probe {
        if let Some(timeout) = probe.timeout_ms {
            if !(MIN_PROBE_TIMEOUT_MS..=MAX_PROBE_TIMEOUT_MS).contains(&timeout) {
                return Err(ConfigError::InvalidProbeTimeout(timeout));
            }
            config.probe.timeout_ms = timeout;
        }
        if let Some(agent) = probe.user_agent {
            let trimmed = agent.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidUserAgent);
            }
            config.probe.user_agent = Some(trimmed.to_string());
        }
    }

    if let Some(known) = parsed.known_names {
        config.resolver =
            DomainResolver::with_known_names(known).map_err(ConfigError::InvalidKnownName)?;
    }

    Ok(config)
}

fn merge_providers(providers: ProvidersFile) -> Result<ProviderCascade> {
    let tiers = providers.tiers.unwrap_or(MAX_TIERS);
    if tiers == 0 || tiers > MAX_TIERS {
        return Err(ConfigError::InvalidTierCount(tiers));
    }

    let entries = [
        ("primary", providers.primary, CLEARBIT_TEMPLATE),
        ("secondary", providers.secondary, UPLEAD_TEMPLATE),
        ("tertiary", providers.tertiary, FAVICON_TEMPLATE),
    ];
    let mut templates = Vec::with_capacity(MAX_TIERS);
    for (tier, raw, default) in entries {
        let raw = raw.as_deref().unwrap_or(default);
        let template = ProviderTemplate::new(raw)
            .map_err(|source| ConfigError::InvalidProviderTemplate { tier, source })?;
        templates.push(template);
    }

    ProviderCascade::new(templates)
        .and_then(|cascade| cascade.truncated(tiers))
        .map_err(|_| ConfigError::InvalidTierCount(tiers))
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
