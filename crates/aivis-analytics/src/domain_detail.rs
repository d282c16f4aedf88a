//! Drill-down into a single cited domain.

use std::collections::{BTreeMap, HashSet};

use aivis_core::Competitor;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::page_type::{effective_page_type, PageType};
use crate::parse::DecodedRecord;
use crate::stats::{pct_of, top_k_by};
use crate::urls::{normalize_domain, url_match_key};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlUsage {
    pub url: String,
    pub page_type: PageType,
    pub citations: u32,
    pub responses: u32,
    /// Share of responses citing the domain that cited this URL.
    pub usage_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub citations: u32,
    pub responses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTypeCount {
    pub page_type: PageType,
    pub citations: u32,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandCount {
    pub name: String,
    pub responses: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetail {
    pub domain: String,
    pub urls: Vec<UrlUsage>,
    pub daily_citations: Vec<DailyCount>,
    pub page_types: Vec<PageTypeCount>,
    pub competitor_mentions: Vec<BrandCount>,
    pub total_citations: u32,
    pub responses_with_domain: u32,
    /// Responses citing the domain that also mentioned the business.
    pub brand_mentions: u32,
}

#[derive(Debug)]
struct UrlTally {
    url: String,
    page_type: PageType,
    citations: u32,
    responses: u32,
}

/// Per-URL, per-day and per-page-type citation counts for `domain`.
///
/// Citation counts are weighted by each entry's `citations` field and
/// saturate at `u32::MAX`. Tracked competitors are always listed under
/// `competitor_mentions`, untracked names only once observed.
#[must_use]
pub fn domain_detail(
    records: &[DecodedRecord<'_>],
    domain: &str,
    competitors: &[Competitor],
) -> DomainDetail {
    let target = normalize_domain(domain);

    let mut urls: IndexMap<String, UrlTally> = IndexMap::new();
    let mut days: BTreeMap<NaiveDate, DailyCount> = BTreeMap::new();
    let mut page_types: IndexMap<PageType, u32> = IndexMap::new();
    let mut mentions: IndexMap<String, u32> = competitors
        .iter()
        .map(|c| (c.name.clone(), 0))
        .collect();
    let mut total_citations = 0u32;
    let mut responses_with_domain = 0u32;
    let mut brand_mentions = 0u32;

    for rec in records {
        let mut cited = false;
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut response_citations = 0u32;

        for source in rec.sources.iter().filter(|s| s.domain == target) {
            cited = true;
            let weight = source.citation_weight();
            response_citations = response_citations.saturating_add(weight);

            let page_type = effective_page_type(source);
            let by_type = page_types.entry(page_type).or_default();
            *by_type = by_type.saturating_add(weight);

            let key = url_match_key(&source.url);
            let tally = urls.entry(key.clone()).or_insert_with(|| UrlTally {
                url: source.url.clone(),
                page_type,
                citations: 0,
                responses: 0,
            });
            tally.citations = tally.citations.saturating_add(weight);
            if seen_urls.insert(key) {
                tally.responses += 1;
            }
        }

        if !cited {
            continue;
        }

        responses_with_domain += 1;
        total_citations = total_citations.saturating_add(response_citations);
        if rec.brand_mentioned() {
            brand_mentions += 1;
        }
        for name in &rec.competitors_mentioned {
            let existing = mentions.keys().find(|k| k.eq_ignore_ascii_case(name)).cloned();
            *mentions.entry(existing.unwrap_or_else(|| name.clone())).or_default() += 1;
        }

        let day = rec.record.bucket_date();
        let daily = days.entry(day).or_insert(DailyCount {
            date: day,
            citations: 0,
            responses: 0,
        });
        daily.citations = daily.citations.saturating_add(response_citations);
        daily.responses += 1;
    }

    let url_rows = urls
        .into_values()
        .map(|t| UrlUsage {
            usage_pct: pct_of(t.responses as usize, responses_with_domain as usize),
            url: t.url,
            page_type: t.page_type,
            citations: t.citations,
            responses: t.responses,
        })
        .collect();

    let page_type_rows = page_types
        .into_iter()
        .map(|(page_type, citations)| PageTypeCount {
            page_type,
            citations,
            pct: pct_of(citations as usize, total_citations as usize),
        })
        .collect();

    let mention_rows = mentions
        .into_iter()
        .map(|(name, responses)| BrandCount { name, responses })
        .collect();

    tracing::debug!(
        domain = %target,
        responses = responses_with_domain,
        citations = total_citations,
        "built domain detail"
    );

    DomainDetail {
        domain: target,
        urls: top_k_by(url_rows, usize::MAX, |u| f64::from(u.citations)),
        daily_citations: days.into_values().collect(),
        page_types: top_k_by(page_type_rows, usize::MAX, |p| f64::from(p.citations)),
        competitor_mentions: top_k_by(mention_rows, usize::MAX, |b| f64::from(b.responses)),
        total_citations,
        responses_with_domain,
        brand_mentions,
    }
}

#[cfg(test)]
mod tests {
    use aivis_core::{BrandAliases, ExecutionRecord};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use super::*;
    use crate::parse::decode_all;

    fn record(id: i64, day: u32, mentions: i64, competitors: Value, sources: Value) -> ExecutionRecord {
        ExecutionRecord {
            id,
            prompt_id: id,
            platform_id: 1,
            completed_at: Utc.with_ymd_and_hms(2025, 6, day, 10, 0, 0).unwrap(),
            refresh_date: None,
            business_visibility: None,
            competitor_visibilities: None,
            brand_mention_count: Some(mentions),
            competitors_mentioned: Some(competitors),
            sources: Some(sources),
            prompt_text: None,
        }
    }

    fn tracked() -> Vec<Competitor> {
        vec![
            Competitor {
                id: 10,
                name: "Globex".to_string(),
            },
            Competitor {
                id: 11,
                name: "Initech".to_string(),
            },
        ]
    }

    fn fixture() -> Vec<ExecutionRecord> {
        vec![
            record(
                1,
                2,
                0,
                json!(["Globex", "Hooli"]),
                json!([
                    { "domain": "g2.com", "url": "https://www.g2.com/compare/a-vs-b/", "type": "UGC", "citations": 2 },
                    { "domain": "g2.com", "url": "https://g2.com/categories/crm", "type": "UGC" },
                    { "domain": "reddit.com", "url": "https://reddit.com/r/crm", "type": "UGC" }
                ]),
            ),
            record(
                2,
                1,
                1,
                json!(["Globex"]),
                json!([{ "domain": "G2.com", "url": "https://g2.com/compare/a-vs-b", "type": "UGC" }]),
            ),
            record(3, 1, 1, json!([]), json!([{ "domain": "acme.com", "url": "https://acme.com/", "type": "You" }])),
        ]
    }

    #[test]
    fn unknown_domain_yields_empty_detail() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let detail = domain_detail(&decoded, "nowhere.example", &[]);
        assert_eq!(detail.domain, "nowhere.example");
        assert!(detail.urls.is_empty());
        assert_eq!(detail.responses_with_domain, 0);
    }

    #[test]
    fn groups_urls_ignoring_scheme_host_case_and_trailing_slash() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let detail = domain_detail(&decoded, "www.g2.com", &tracked());

        assert_eq!(detail.domain, "g2.com");
        assert_eq!(detail.total_citations, 4);
        assert_eq!(detail.responses_with_domain, 2);
        assert_eq!(detail.brand_mentions, 1);

        let compare = &detail.urls[0];
        assert_eq!(compare.page_type, PageType::Comparison);
        assert_eq!(compare.citations, 3);
        assert_eq!(compare.responses, 2);
        assert_eq!(compare.usage_pct, 100.0);

        let category = &detail.urls[1];
        assert_eq!(category.page_type, PageType::CategoryPage);
        assert_eq!(category.usage_pct, 50.0);
    }

    #[test]
    fn daily_counts_are_ascending() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let detail = domain_detail(&decoded, "g2.com", &tracked());
        let days: Vec<(u32, u32)> = detail
            .daily_citations
            .iter()
            .map(|d| (d.citations, d.responses))
            .collect();
        assert_eq!(days, vec![(1, 1), (3, 1)]);
        assert!(detail.daily_citations[0].date < detail.daily_citations[1].date);
    }

    #[test]
    fn page_type_breakdown_is_weighted() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let detail = domain_detail(&decoded, "g2.com", &tracked());
        assert_eq!(
            detail.page_types,
            vec![
                PageTypeCount {
                    page_type: PageType::Comparison,
                    citations: 3,
                    pct: 75.0,
                },
                PageTypeCount {
                    page_type: PageType::CategoryPage,
                    citations: 1,
                    pct: 25.0,
                },
            ]
        );
    }

    #[test]
    fn counts_competitor_co_mentions_including_untracked() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let detail = domain_detail(&decoded, "g2.com", &tracked());
        let rows: Vec<(&str, u32)> = detail
            .competitor_mentions
            .iter()
            .map(|b| (b.name.as_str(), b.responses))
            .collect();
        assert_eq!(rows, vec![("Globex", 2), ("Hooli", 1), ("Initech", 0)]);
    }

    #[test]
    fn huge_citation_weights_saturate() {
        let records = vec![record(
            1,
            3,
            0,
            json!([]),
            json!([
                { "domain": "g2.com", "url": "https://g2.com/compare/a-vs-b", "type": "UGC", "citations": u32::MAX },
                { "domain": "g2.com", "url": "https://g2.com/compare/a-vs-b", "type": "UGC", "citations": 2 }
            ]),
        )];
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let detail = domain_detail(&decoded, "g2.com", &[]);

        assert_eq!(detail.total_citations, u32::MAX);
        assert_eq!(detail.urls[0].citations, u32::MAX);
        assert_eq!(detail.page_types[0].citations, u32::MAX);
        assert_eq!(detail.daily_citations[0].citations, u32::MAX);
        assert_eq!(detail.page_types[0].pct, 100.0);
    }
}
