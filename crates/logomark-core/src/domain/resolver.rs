use crate::domain::known::{lookup, KNOWN_COMPANIES, KNOWN_INSTITUTIONS};
use crate::domain::name::{clean_name, compact, NormalizedKey, OrganizationKind};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const MIN_GUESS_LEN: usize = 3;

const CONNECTOR_WORDS: &[&str] = &["of", "the", "and", "at", "for", "in", "de"];
const GENERIC_INSTITUTION_WORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "polytechnic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainDerivation {
    KnownName,
    DomainLike,
    Compacted,
    InstitutionGuess,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub value: String,
    pub derivation: DomainDerivation,
}

impl Domain {
    fn new(value: impl Into<String>, derivation: DomainDerivation) -> Self {
        Self {
            value: value.into(),
            derivation,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Maps free-text organization names to best-guess domains.
///
/// Pure: no network access, the same input always yields the same output.
/// Extra known names (from configuration) take precedence over the built-in
/// tables.
#[derive(Debug, Clone, Default)]
pub struct DomainResolver {
    extra: HashMap<String, String>,
}

impl DomainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known_names<I, K, V>(entries: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut extra = HashMap::new();
        for (name, domain) in entries {
            let (name, domain) = validate_known_name(name.as_ref(), domain.as_ref())?;
            extra.insert(name, domain);
        }
        Ok(Self { extra })
    }

    pub fn extra_len(&self) -> usize {
        self.extra.len()
    }

    /// Single best-guess domain for a company name.
    pub fn resolve(&self, name: &str) -> Option<Domain> {
        let key = NormalizedKey::new(name);
        if key.is_empty() {
            return None;
        }
        if let Some(domain) = self.known(key.as_str(), OrganizationKind::Company) {
            return Some(Domain::new(domain, DomainDerivation::KnownName));
        }

        let cleaned = clean_name(key.as_str());
        if cleaned.is_empty() {
            return None;
        }
        if let Some(domain) = self.known(&cleaned, OrganizationKind::Company) {
            return Some(Domain::new(domain, DomainDerivation::KnownName));
        }
        if cleaned.contains('.') {
            return Some(Domain::new(cleaned, DomainDerivation::DomainLike));
        }

        let compacted = compact(&cleaned);
        if compacted.chars().count() >= MIN_GUESS_LEN {
            return Some(Domain::new(
                format!("{}.com", compacted),
                DomainDerivation::Compacted,
            ));
        }
        None
    }

    /// Ordered domain guesses for an institution name, best first.
    pub fn candidates(&self, name: &str) -> Vec<Domain> {
        let key = NormalizedKey::new(name);
        if key.is_empty() {
            return Vec::new();
        }
        if let Some(domain) = self.known(key.as_str(), OrganizationKind::Institution) {
            return vec![Domain::new(domain, DomainDerivation::KnownName)];
        }

        let cleaned = clean_name(key.as_str());
        if cleaned.is_empty() {
            return Vec::new();
        }
        if let Some(domain) = self.known(&cleaned, OrganizationKind::Institution) {
            return vec![Domain::new(domain, DomainDerivation::KnownName)];
        }
        if cleaned.contains('.') {
            return vec![Domain::new(cleaned, DomainDerivation::DomainLike)];
        }

        institution_guesses(&cleaned)
    }

    pub fn resolve_for(&self, kind: OrganizationKind, name: &str) -> Vec<Domain> {
        match kind {
            OrganizationKind::Company => self.resolve(name).into_iter().collect(),
            OrganizationKind::Institution => self.candidates(name),
        }
    }

    fn known(&self, key: &str, kind: OrganizationKind) -> Option<String> {
        if let Some(domain) = self.extra.get(key) {
            return Some(domain.clone());
        }
        let (first, second) = match kind {
            OrganizationKind::Company => (KNOWN_COMPANIES, KNOWN_INSTITUTIONS),
            OrganizationKind::Institution => (KNOWN_INSTITUTIONS, KNOWN_COMPANIES),
        };
        lookup(first, key)
            .or_else(|| lookup(second, key))
            .map(str::to_string)
    }
}

/// Company domain using only the built-in known-name tables.
pub fn resolve_domain(name: &str) -> Option<String> {
    DomainResolver::new().resolve(name).map(|domain| domain.value)
}

/// Institution domain candidates using only the built-in known-name tables.
pub fn resolve_domain_candidates(name: &str) -> Vec<String> {
    DomainResolver::new()
        .candidates(name)
        .into_iter()
        .map(|domain| domain.value)
        .collect()
}

fn institution_guesses(cleaned: &str) -> Vec<Domain> {
    let words: Vec<&str> = cleaned.split(' ').filter(|word| !word.is_empty()).collect();
    let compacted: String = words.concat();
    let significant: Vec<&str> = words
        .iter()
        .copied()
        .filter(|word| !CONNECTOR_WORDS.contains(word))
        .collect();
    let core: String = significant
        .iter()
        .copied()
        .filter(|word| !GENERIC_INSTITUTION_WORDS.contains(word))
        .collect();
    let acronym: String = if significant.len() >= 2 {
        significant
            .iter()
            .filter_map(|word| word.chars().next())
            .collect()
    } else {
        String::new()
    };

    let stems = [
        (acronym.as_str(), "edu"),
        (core.as_str(), "edu"),
        (compacted.as_str(), "edu"),
        (core.as_str(), "ac.uk"),
        (compacted.as_str(), "com"),
    ];

    let mut out: Vec<Domain> = Vec::new();
    for (stem, tld) in stems {
        if stem.chars().count() < MIN_GUESS_LEN {
            continue;
        }
        let value = format!("{}.{}", stem, tld);
        if out.iter().any(|existing| existing.value == value) {
            continue;
        }
        out.push(Domain::new(value, DomainDerivation::InstitutionGuess));
    }
    out
}

fn validate_known_name(name: &str, domain: &str) -> Result<(String, String), CoreError> {
    let key = NormalizedKey::new(name);
    if key.is_empty() {
        return Err(CoreError::InvalidKnownName(name.to_string()));
    }
    let normalized_domain = domain.trim().to_ascii_lowercase();
    let valid = !normalized_domain.is_empty()
        && normalized_domain.contains('.')
        && !normalized_domain.starts_with('.')
        && !normalized_domain.ends_with('.')
        && normalized_domain
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '.' || ch == '-');
    if !valid {
        return Err(CoreError::InvalidKnownDomain {
            name: key.as_str().to_string(),
            domain: domain.to_string(),
        });
    }
    Ok((key.as_str().to_string(), normalized_domain))
}
