//! Name, alias and URL resolution over the built-in template table.

mod builtin;

pub use builtin::{LAZADA_CATALOG_ENDPOINT, SHOPEE_SEARCH_ENDPOINT};

use crate::template::Template;

const FALLBACK_KEY: &str = "generic";

/// Resolves a template key, alias or URL to a built-in template.
///
/// Order: alias table, then hostname substring patterns for inputs starting
/// with `http`, then exact template key. Anything else gets the generic
/// template, so resolution never fails.
#[must_use]
pub fn resolve(name_or_url: &str) -> Template {
    let lower = name_or_url.trim().to_lowercase();
    let key = resolve_key(&lower).unwrap_or(FALLBACK_KEY);
    tracing::debug!(input = name_or_url, template = key, "resolved template");
    lookup(key).unwrap_or_else(generic)
}

/// All built-in templates in table order.
pub fn templates() -> impl Iterator<Item = &'static Template> {
    builtin::TEMPLATES.iter()
}

/// Exact key lookup without alias or URL matching.
#[must_use]
pub fn lookup(key: &str) -> Option<Template> {
    templates().find(|t| t.key == key).cloned()
}

fn resolve_key(lower: &str) -> Option<&'static str> {
    if let Some(&(_, key)) = builtin::ALIASES.iter().find(|(alias, _)| *alias == lower) {
        return Some(key);
    }

    if lower.starts_with("http") {
        let host = reqwest::Url::parse(lower)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_default();
        if let Some(&(_, key)) = builtin::HOST_PATTERNS
            .iter()
            .find(|(pattern, _)| host.contains(*pattern))
        {
            return Some(key);
        }
    }

    templates().find(|t| t.key == lower).map(|t| t.key)
}

fn generic() -> Template {
    builtin::TEMPLATES[0].clone()
}
