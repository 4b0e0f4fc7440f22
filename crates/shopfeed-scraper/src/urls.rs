//! URL resolution helpers shared by the extractor, fetchers and router.

use reqwest::Url;

/// Resolves an image source against the page URL.
///
/// Protocol-relative, root-relative and relative sources become absolute.
/// Inline `data:` URIs and blank values yield `None`.
#[must_use]
pub fn resolve_image_url(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || has_scheme(raw, "data:") {
        return None;
    }
    base.join(raw).ok().map(String::from)
}

/// Resolves an anchor `href` against the page URL.
///
/// Fragment-only links and `javascript:` / `mailto:` targets are not
/// navigable and yield `None`, as does anything that is not http(s) after
/// resolution.
#[must_use]
pub fn resolve_link(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty()
        || raw.starts_with('#')
        || has_scheme(raw, "javascript:")
        || has_scheme(raw, "mailto:")
    {
        return None;
    }
    let resolved = base.join(raw).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.into())
}

/// Returns the hostname of `url`, or the input itself when it does not parse.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// First non-empty value among the named query parameters, checked in the
/// order given.
#[must_use]
pub fn query_param(url: &Url, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        url.query_pairs()
            .find(|(key, value)| &**key == *name && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_owned())
    })
}

fn has_scheme(raw: &str, scheme: &str) -> bool {
    raw.get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}
