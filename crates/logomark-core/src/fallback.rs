use crate::domain::{NormalizedKey, OrganizationKind};
use serde::{Deserialize, Serialize};

pub const BADGE_PALETTE: [&str; 8] = [
    "#2563eb", "#7c3aed", "#db2777", "#dc2626", "#ea580c", "#16a34a", "#0891b2", "#4b5563",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackIcon {
    Building,
    School,
}

/// What to render when no logo could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackBadge {
    pub initials: String,
    pub color: String,
    pub icon: FallbackIcon,
}

impl FallbackBadge {
    pub fn for_name(kind: OrganizationKind, name: &str) -> Self {
        let key = NormalizedKey::new(name);
        Self {
            initials: initials(name),
            color: badge_color(&key).to_string(),
            icon: match kind {
                OrganizationKind::Company => FallbackIcon::Building,
                OrganizationKind::Institution => FallbackIcon::School,
            },
        }
    }

    /// True when only the generic icon can be shown.
    pub fn is_icon_only(&self) -> bool {
        self.initials.is_empty()
    }
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().find(|ch| ch.is_alphanumeric()))
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn badge_color(key: &NormalizedKey) -> &'static str {
    // FNV-1a, stable across runs and platforms
    let mut hash: u32 = 0x811c_9dc5;
    for byte in key.as_str().bytes() {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    BADGE_PALETTE[(hash as usize) % BADGE_PALETTE.len()]
}
