//! Page-type taxonomy for cited URLs.
//!
//! Classification looks only at the URL path and applies the rule groups in a
//! fixed precedence order; the first group that matches decides. The order is
//! part of the output contract: `/products/a-vs-b` is a comparison, not a
//! product page.

use std::sync::LazyLock;

use aivis_core::SourceCitation;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::urls::url_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageType {
    Comparison,
    Alternative,
    #[serde(rename = "Product Page")]
    ProductPage,
    #[serde(rename = "Category Page")]
    CategoryPage,
    Article,
    Other,
}

impl PageType {
    pub const ALL: [PageType; 6] = [
        PageType::Comparison,
        PageType::Alternative,
        PageType::ProductPage,
        PageType::CategoryPage,
        PageType::Article,
        PageType::Other,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PageType::Comparison => "Comparison",
            PageType::Alternative => "Alternative",
            PageType::ProductPage => "Product Page",
            PageType::CategoryPage => "Category Page",
            PageType::Article => "Article",
            PageType::Other => "Other",
        }
    }

    /// Parse a display label case-insensitively. Unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|page_type| page_type.label().eq_ignore_ascii_case(trimmed))
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

const COMPARISON_TOKENS: [&str; 6] = ["/compare", "/comparison", "/vs", "-vs-", "_vs_", "/versus"];

const ALTERNATIVE_TOKENS: [&str; 5] = [
    "/alternative",
    "/competitors",
    "/similar-to",
    "/like-",
    "/instead-of",
];

const PRODUCT_TOKENS: [&str; 8] = [
    "/product",
    "/pricing",
    "/features",
    "/solutions",
    "/services",
    "/software/",
    "/tool/",
    "/app/",
];

const CATEGORY_TOKENS: [&str; 6] = [
    "/category",
    "/categories",
    "/best-",
    "/top-",
    "/list-of",
    "/directory",
];

const ARTICLE_TOKENS: [&str; 10] = [
    "/blog",
    "/article",
    "/post",
    "/news",
    "/guide",
    "/how-to",
    "/what-is",
    "/learn",
    "/resources",
    "/wiki",
];

static PRODUCT_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(?:p|products)/[^/]+/?$").expect("valid regex"));
static CATEGORY_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/[a-z0-9_]+(?:-[a-z0-9_]+)+/?$").expect("valid regex")
});
static DATE_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d{4}/\d{2}/").expect("valid regex"));

/// Classify a cited URL by its path.
///
/// Pure and deterministic: the same string always yields the same category.
#[must_use]
pub fn classify_url(url: &str) -> PageType {
    classify_path(&url_path(url))
}

fn classify_path(path: &str) -> PageType {
    let contains_any = |tokens: &[&str]| tokens.iter().any(|token| path.contains(token));

    if contains_any(&COMPARISON_TOKENS) {
        return PageType::Comparison;
    }
    if contains_any(&ALTERNATIVE_TOKENS) {
        return PageType::Alternative;
    }
    if contains_any(&PRODUCT_TOKENS) || PRODUCT_SLUG_RE.is_match(path) {
        return PageType::ProductPage;
    }
    if contains_any(&CATEGORY_TOKENS) || CATEGORY_SLUG_RE.is_match(path) {
        return PageType::CategoryPage;
    }
    if contains_any(&ARTICLE_TOKENS)
        || DATE_SEGMENT_RE.is_match(path)
        || path.ends_with(".html")
        || path.ends_with(".htm")
    {
        return PageType::Article;
    }
    PageType::Other
}

/// Page type for a citation: the upstream label when it names a known
/// category, otherwise the URL classification.
#[must_use]
pub fn effective_page_type(citation: &SourceCitation) -> PageType {
    citation
        .page_type
        .as_deref()
        .and_then(PageType::from_label)
        .unwrap_or_else(|| classify_url(&citation.url))
}

#[cfg(test)]
#[path = "page_type_test.rs"]
mod tests;
