//! Profile URL shape validation and normalization.
//!
//! A profile link is only useful if it leads to a person. Links to articles,
//! posts, company pages and the like are rejected outright; professional
//! network (LinkedIn) links must have the personal-profile shape
//! `/in/<handle>[/<lang>]/`, including country-localized hosts such as
//! `sg.linkedin.com`. Everything else is assumed to be a personal website.

use crate::traits::Rejection;
use once_cell::sync::Lazy;
use regex::Regex;

/// Substrings that mark a URL as something other than a profile page.
pub const URL_DENYLIST: [&str; 20] = [
    "/pulse/",
    "/posts/",
    "/activity/",
    "/article/",
    "/blog/",
    "/news/",
    "/events/",
    "/jobs/",
    "/learning/",
    "/courses/",
    "/showcase/",
    "/company/",
    "/school/",
    "/groups/",
    "/feed/",
    "/detail/",
    "medium.com",
    "substack.com",
    "youtube.com/watch",
    "facebook.com/posts",
];

const PROFESSIONAL_NETWORK_DOMAIN: &str = "linkedin.com";

/// `https://[www.|cc.]linkedin.com/in/<handle>[/<lang>][/]`
static PERSONAL_PROFILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(?:(?:www|[a-z]{2})\.)?linkedin\.com/in/[a-z0-9_%\-]+(?:/[a-z]{2})?/?$")
        .expect("personal profile pattern is valid")
});

/// Same shape, but only matching when a language segment is present.
static LOCALIZED_PROFILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://(?:(?:www|[a-z]{2})\.)?linkedin\.com/in/[a-z0-9_%\-]+)/[a-z]{2}/?$")
        .expect("localized profile pattern is valid")
});

static PROFILE_HANDLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)linkedin\.com/in/([a-z0-9_%\-]+)").expect("profile handle pattern is valid")
});

static CODE_HOST_PROFILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?github\.com/[a-z0-9\-]+/?$")
        .expect("code host pattern is valid")
});

static SOCIAL_PROFILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?(?:twitter|x)\.com/[a-z0-9_]+/?$")
        .expect("social profile pattern is valid")
});

/// What kind of page a profile link leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileUrlKind {
    ProfessionalNetwork,
    CodeHost,
    SocialProfile,
    PersonalSite,
}

/// The first denylisted substring found in `url`, case-insensitively.
pub fn denylisted_segment(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    URL_DENYLIST
        .iter()
        .copied()
        .find(|segment| lower.contains(segment))
}

/// Whether `url` belongs to the professional network.
pub fn is_professional_network(url: &str) -> bool {
    url.to_lowercase().contains(PROFESSIONAL_NETWORK_DOMAIN)
}

/// Check a profile link, reporting why it was refused.
pub fn check_profile_url(url: &str) -> Result<(), Rejection> {
    let url = url.trim();

    if let Some(segment) = denylisted_segment(url) {
        return Err(Rejection::UrlDenylisted {
            url: url.to_string(),
            segment,
        });
    }

    if is_professional_network(url) && !PERSONAL_PROFILE.is_match(url) {
        return Err(Rejection::NotPersonalProfile {
            url: url.to_string(),
        });
    }

    Ok(())
}

/// Whether `url` looks like a link to a person's profile or site.
pub fn is_valid_profile_url(url: &str) -> bool {
    !url.trim().is_empty() && check_profile_url(url).is_ok()
}

/// Strip a trailing language segment from a localized personal-profile URL.
///
/// `https://sg.linkedin.com/in/jdoe/en` becomes
/// `https://sg.linkedin.com/in/jdoe/`. URLs of any other shape come back
/// unchanged, and cleaning a cleaned URL is a no-op.
pub fn clean_profile_url(url: &str) -> String {
    match LOCALIZED_PROFILE.captures(url) {
        Some(caps) => format!("{}/", &caps[1]),
        None => url.to_string(),
    }
}

/// The `/in/<handle>` part of a professional-network URL.
pub fn profile_handle(url: &str) -> Option<&str> {
    PROFILE_HANDLE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Classify a profile link for display.
pub fn classify_profile_url(url: &str) -> ProfileUrlKind {
    let url = url.trim();
    if is_professional_network(url) {
        ProfileUrlKind::ProfessionalNetwork
    } else if CODE_HOST_PROFILE.is_match(url) {
        ProfileUrlKind::CodeHost
    } else if SOCIAL_PROFILE.is_match(url) {
        ProfileUrlKind::SocialProfile
    } else {
        ProfileUrlKind::PersonalSite
    }
}
