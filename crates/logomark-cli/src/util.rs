use crate::error::invalid_input;
use anyhow::Result;
use logomark_core::{FallbackBadge, LogoDisplay, OrganizationKind};
use url::Url;

pub fn organization_kind(institution: bool) -> OrganizationKind {
    if institution {
        OrganizationKind::Institution
    } else {
        OrganizationKind::Company
    }
}

pub fn kind_label(kind: OrganizationKind) -> &'static str {
    match kind {
        OrganizationKind::Company => "company",
        OrganizationKind::Institution => "institution",
    }
}

/// Accepts absolute http(s) URLs only.
pub fn parse_logo_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("logo url cannot be empty"));
    }
    let url = Url::parse(trimmed).map_err(|_| invalid_input("invalid logo url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid_input("logo url must use http or https"));
    }
    Ok(url.to_string())
}

pub fn format_badge(badge: &FallbackBadge) -> String {
    if badge.is_icon_only() {
        format!("fallback icon ({:?})", badge.icon).to_lowercase()
    } else {
        format!("fallback {} {}", badge.initials, badge.color)
    }
}

pub fn format_display(display: &LogoDisplay) -> String {
    match display {
        LogoDisplay::Image { url } => url.clone(),
        LogoDisplay::Fallback(badge) => format_badge(badge),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_badge, parse_logo_url};
    use logomark_core::{FallbackBadge, OrganizationKind};

    #[test]
    fn logo_urls_must_be_http() {
        assert_eq!(
            parse_logo_url(" https://cdn.example/logo.png ").unwrap(),
            "https://cdn.example/logo.png"
        );
        assert!(parse_logo_url("ftp://cdn.example/logo.png").is_err());
        assert!(parse_logo_url("logo.png").is_err());
        assert!(parse_logo_url("").is_err());
    }

    #[test]
    fn badges_render_initials_or_icon() {
        let badge = FallbackBadge::for_name(OrganizationKind::Company, "Acme Widgets");
        assert!(format_badge(&badge).starts_with("fallback AW #"));
        let icon = FallbackBadge::for_name(OrganizationKind::Company, "");
        assert_eq!(format_badge(&icon), "fallback icon (building)");
    }
}
