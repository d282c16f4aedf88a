//! URL and domain normalization shared by the classifier and source views.

use url::Url;

/// Lowercased path of `raw` with scheme, host, query and fragment removed.
///
/// Accepts absolute URLs, scheme-less `host/path` strings and bare paths.
/// Returns an empty string when there is no path.
#[must_use]
pub fn url_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(parsed) = Url::parse(trimmed) {
        if parsed.has_host() {
            return parsed.path().to_lowercase();
        }
    }

    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
    let without_scheme = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);
    let path = if without_scheme.starts_with('/') {
        without_scheme
    } else {
        without_scheme
            .find('/')
            .map_or("", |idx| &without_scheme[idx..])
    };
    path.to_lowercase()
}

/// Canonical form of a cited domain: lowercase host without `www.`, port,
/// scheme or path. Falls back to trimming the raw string when it is not a URL.
#[must_use]
pub fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let host = host_of(trimmed).unwrap_or_else(|| {
        let without_scheme = trimmed
            .split_once("://")
            .map_or(trimmed, |(_, rest)| rest);
        without_scheme
            .split(['/', '?', '#', ':'])
            .next()
            .unwrap_or_default()
            .to_lowercase()
    });

    host.trim_start_matches("www.").trim_end_matches('.').to_string()
}

/// Lowercase host of an absolute URL, or `None` when `raw` has no host.
#[must_use]
pub fn host_of(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    parsed.host_str().map(str::to_lowercase)
}

/// Comparable key for URL equality: host normalized as a domain, path
/// without trailing slash, query kept, fragment and scheme dropped.
#[must_use]
pub fn url_match_key(raw: &str) -> String {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(parsed) if parsed.has_host() => {
            let host = normalize_domain(parsed.host_str().unwrap_or_default());
            let path = parsed.path().trim_end_matches('/');
            match parsed.query() {
                Some(query) => format!("{host}{path}?{query}"),
                None => format!("{host}{path}"),
            }
        }
        _ => {
            let without_fragment = trimmed.split('#').next().unwrap_or_default();
            let without_scheme = without_fragment
                .split_once("://")
                .map_or(without_fragment, |(_, rest)| rest);
            let (host, rest) = without_scheme
                .find(['/', '?'])
                .map_or((without_scheme, ""), |idx| without_scheme.split_at(idx));
            let (path, query) = rest.split_once('?').map_or((rest, None), |(p, q)| (p, Some(q)));
            let path = path.trim_end_matches('/');
            match query {
                Some(query) => format!("{}{path}?{query}", normalize_domain(host)),
                None => format!("{}{path}", normalize_domain(host)),
            }
        }
    }
}
