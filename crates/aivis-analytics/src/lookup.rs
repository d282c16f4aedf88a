//! Find the executions whose source list cites a URL or domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parse::DecodedRecord;
use crate::urls::{normalize_domain, url_match_key};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceTarget {
    Url(String),
    Domain(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMatch {
    pub execution_id: i64,
    pub prompt_id: i64,
    pub platform_id: i64,
    pub prompt_text: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub brand_mentioned: bool,
    pub matched_urls: Vec<String>,
}

/// Executions citing `target`, newest first.
///
/// URLs compare without scheme, fragment or trailing slash and with the host
/// normalized like a domain. Domains compare after normalization.
#[must_use]
pub fn find_executions(records: &[DecodedRecord<'_>], target: &SourceTarget) -> Vec<ExecutionMatch> {
    let matches_source: Box<dyn Fn(&str, &str) -> bool> = match target {
        SourceTarget::Url(url) => {
            let wanted = url_match_key(url);
            Box::new(move |_, source_url| url_match_key(source_url) == wanted)
        }
        SourceTarget::Domain(domain) => {
            let wanted = normalize_domain(domain);
            Box::new(move |source_domain, _| source_domain == wanted)
        }
    };

    let mut found: Vec<ExecutionMatch> = records
        .iter()
        .filter_map(|rec| {
            let mut matched_urls: Vec<String> = Vec::new();
            for source in &rec.sources {
                if matches_source(&source.domain, &source.url) && !matched_urls.contains(&source.url) {
                    matched_urls.push(source.url.clone());
                }
            }
            if matched_urls.is_empty() {
                return None;
            }
            Some(ExecutionMatch {
                execution_id: rec.record.id,
                prompt_id: rec.record.prompt_id,
                platform_id: rec.record.platform_id,
                prompt_text: rec.record.prompt_text.clone(),
                completed_at: rec.record.completed_at,
                brand_mentioned: rec.brand_mentioned(),
                matched_urls,
            })
        })
        .collect();

    found.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    found
}

#[cfg(test)]
mod tests {
    use aivis_core::{BrandAliases, ExecutionRecord};
    use chrono::TimeZone;
    use serde_json::{json, Value};

    use super::*;
    use crate::parse::decode_all;

    fn record(id: i64, hour: u32, sources: Value) -> ExecutionRecord {
        ExecutionRecord {
            id,
            prompt_id: 7,
            platform_id: 2,
            completed_at: Utc.with_ymd_and_hms(2025, 7, 1, hour, 0, 0).unwrap(),
            refresh_date: None,
            business_visibility: None,
            competitor_visibilities: None,
            brand_mention_count: Some(id % 2),
            competitors_mentioned: None,
            sources: Some(sources),
            prompt_text: Some("best crm for startups".to_string()),
        }
    }

    fn fixture() -> Vec<ExecutionRecord> {
        vec![
            record(1, 8, json!([{ "domain": "g2.com", "url": "https://g2.com/crm/" }])),
            record(2, 12, json!([{ "domain": "www.g2.com", "url": "http://www.G2.com/crm" }])),
            record(3, 10, json!([{ "domain": "g2.com", "url": "https://g2.com/other" }])),
            record(4, 9, json!("garbage")),
        ]
    }

    #[test]
    fn url_lookup_ignores_scheme_www_and_trailing_slash() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let found = find_executions(&decoded, &SourceTarget::Url("g2.com/crm".to_string()));
        let ids: Vec<i64> = found.iter().map(|m| m.execution_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(found[1].matched_urls, vec!["https://g2.com/crm/".to_string()]);
        assert!(!found[0].brand_mentioned);
        assert!(found[1].brand_mentioned);
    }

    #[test]
    fn domain_lookup_returns_newest_first() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        let found = find_executions(&decoded, &SourceTarget::Domain("WWW.G2.COM".to_string()));
        let ids: Vec<i64> = found.iter().map(|m| m.execution_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(found[0].prompt_text.as_deref(), Some("best crm for startups"));
    }

    #[test]
    fn no_match_yields_empty_list() {
        let records = fixture();
        let decoded = decode_all(&records, &BrandAliases::default(), "Acme");
        assert!(find_executions(&decoded, &SourceTarget::Domain("reddit.com".to_string())).is_empty());
    }
}
