use super::*;

fn citation(url: &str, page_type: Option<&str>) -> SourceCitation {
    SourceCitation {
        domain: "x.com".to_string(),
        url: url.to_string(),
        source_type: "Editorial".to_string(),
        page_type: page_type.map(ToString::to_string),
        citations: None,
        associated_brands: None,
    }
}

// -----------------------------------------------------------------------
// Documented examples
// -----------------------------------------------------------------------

#[test]
fn comparison_wins_over_product_pattern() {
    assert_eq!(
        classify_url("https://x.com/products/widget-vs-gadget"),
        PageType::Comparison
    );
}

#[test]
fn dated_blog_post_is_article() {
    assert_eq!(
        classify_url("https://x.com/blog/2024/01/post"),
        PageType::Article
    );
}

#[test]
fn pricing_is_product_page() {
    assert_eq!(classify_url("https://x.com/pricing"), PageType::ProductPage);
}

#[test]
fn unmatched_single_word_is_other() {
    assert_eq!(classify_url("https://x.com/random"), PageType::Other);
}

// -----------------------------------------------------------------------
// Rule groups
// -----------------------------------------------------------------------

#[test]
fn comparison_tokens() {
    for url in [
        "https://x.com/compare/acme",
        "https://x.com/comparison",
        "https://x.com/vs/globex",
        "https://x.com/acme-vs-globex",
        "https://x.com/acme_vs_globex",
        "https://x.com/versus",
    ] {
        assert_eq!(classify_url(url), PageType::Comparison, "{url}");
    }
}

#[test]
fn alternative_tokens() {
    for url in [
        "https://x.com/alternatives/acme",
        "https://x.com/acme/competitors",
        "https://x.com/similar-to/acme",
        "https://x.com/tools/like-acme",
        "https://x.com/instead-of-acme",
    ] {
        assert_eq!(classify_url(url), PageType::Alternative, "{url}");
    }
}

#[test]
fn alternative_wins_over_product_and_category() {
    assert_eq!(
        classify_url("https://x.com/product/alternatives"),
        PageType::Alternative
    );
    assert_eq!(
        classify_url("https://x.com/best-crm/alternative"),
        PageType::Alternative
    );
}

#[test]
fn product_tokens_and_slug_patterns() {
    for url in [
        "https://x.com/product/crm",
        "https://x.com/features",
        "https://x.com/solutions/sales",
        "https://x.com/services/onboarding",
        "https://x.com/software/crm",
        "https://x.com/tool/acme",
        "https://x.com/app/acme",
        "https://x.com/p/acme-crm",
        "https://x.com/p/acme-crm/",
    ] {
        assert_eq!(classify_url(url), PageType::ProductPage, "{url}");
    }
}

#[test]
fn product_wins_over_category() {
    assert_eq!(
        classify_url("https://x.com/pricing/best-plans"),
        PageType::ProductPage
    );
}

#[test]
fn category_tokens_and_bare_slug() {
    for url in [
        "https://x.com/category/crm",
        "https://x.com/categories",
        "https://x.com/best-crm-software",
        "https://x.com/top-10-crms",
        "https://x.com/list-of-crms",
        "https://x.com/directory/sales",
        "https://x.com/crm-for-startups",
        "https://x.com/crm-for-startups/",
    ] {
        assert_eq!(classify_url(url), PageType::CategoryPage, "{url}");
    }
}

#[test]
fn hyphenated_single_segment_is_category_even_when_article_like() {
    assert_eq!(
        classify_url("https://x.com/how-to-choose-a-crm"),
        PageType::CategoryPage
    );
}

#[test]
fn category_wins_over_article() {
    assert_eq!(
        classify_url("https://x.com/blog/best-crm-tools"),
        PageType::CategoryPage
    );
}

#[test]
fn article_tokens_dates_and_html_suffix() {
    for url in [
        "https://x.com/blog",
        "https://x.com/articles/crm",
        "https://x.com/posts/1",
        "https://x.com/news/acme-raises",
        "https://x.com/guides/crm",
        "https://x.com/how-to/choose-a-crm",
        "https://x.com/what-is/crm",
        "https://x.com/learn/crm",
        "https://x.com/resources/ebook",
        "https://x.com/wiki/crm",
        "https://x.com/2023/11/acme",
        "https://x.com/story.html",
        "https://x.com/story.htm",
    ] {
        assert_eq!(classify_url(url), PageType::Article, "{url}");
    }
}

#[test]
fn unmatched_paths_are_other() {
    for url in [
        "https://x.com/",
        "https://x.com",
        "https://x.com/about/team",
        "https://x.com/r/sales/comments",
        "",
    ] {
        assert_eq!(classify_url(url), PageType::Other, "{url}");
    }
}

#[test]
fn classification_ignores_host_query_and_case() {
    assert_eq!(
        classify_url("https://pricing.x.com/about/team"),
        PageType::Other
    );
    assert_eq!(
        classify_url("https://x.com/about/team?ref=/pricing"),
        PageType::Other
    );
    assert_eq!(classify_url("HTTPS://X.COM/PRICING"), PageType::ProductPage);
}

#[test]
fn scheme_less_urls_classify_by_path() {
    assert_eq!(classify_url("x.com/pricing"), PageType::ProductPage);
}

// -----------------------------------------------------------------------
// Labels and precomputed page types
// -----------------------------------------------------------------------

#[test]
fn labels_round_trip_case_insensitively() {
    for page_type in PageType::ALL {
        assert_eq!(PageType::from_label(page_type.label()), Some(page_type));
    }
    assert_eq!(
        PageType::from_label(" product page "),
        Some(PageType::ProductPage)
    );
    assert_eq!(PageType::from_label("landing"), None);
}

#[test]
fn serializes_with_display_labels() {
    let json = serde_json::to_string(&PageType::CategoryPage).unwrap();
    assert_eq!(json, "\"Category Page\"");
}

#[test]
fn effective_page_type_prefers_known_precomputed_label() {
    let c = citation("https://x.com/pricing", Some("Article"));
    assert_eq!(effective_page_type(&c), PageType::Article);

    let c = citation("https://x.com/pricing", Some("unknown"));
    assert_eq!(effective_page_type(&c), PageType::ProductPage);

    let c = citation("https://x.com/pricing", None);
    assert_eq!(effective_page_type(&c), PageType::ProductPage);
}
