//! Search-index query compilation.
//!
//! Free text becomes a three-tier disjunction: an exact phrase on keyword
//! sub-fields, a phrase prefix, then a substring wildcard. Boosts fall by
//! tier so the cheaper, tighter matches rank first.

use findings_paging::{FetchPlan, FilterParams};
use serde_json::{json, Value};

/// Placeholder values that never represent a real classification.
const PLACEHOLDER_VALUES: [&str; 2] = ["-", ""];

pub const EXACT_BOOST: f64 = 2.0;
pub const PREFIX_BOOST: f64 = 1.5;
pub const WILDCARD_BOOST: f64 = 1.0;

/// Escape wildcard metacharacters so the term is matched literally.
fn escape_wildcard(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '*' | '?') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape Lucene regular-expression metacharacters.
fn escape_regex(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            '.' | '?' | '+' | '*' | '|' | '{' | '}' | '[' | ']' | '(' | ')' | '"' | '\\' | '#'
                | '@' | '&' | '<' | '>' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn tiered_search(term: &str) -> Value {
    let contains = format!("*{}*", escape_wildcard(term));
    let contains_lower = format!("*{}*", escape_wildcard(&term.to_lowercase()));
    json!({
        "bool": {
            "should": [
                {
                    "multi_match": {
                        "query": term,
                        "fields": ["host.keyword^2", "status_code.keyword^2", "url.keyword^1.5"],
                        "type": "phrase",
                        "boost": EXACT_BOOST
                    }
                },
                {
                    "multi_match": {
                        "query": term,
                        "fields": ["host", "url"],
                        "type": "phrase_prefix",
                        "boost": PREFIX_BOOST
                    }
                },
                {
                    "bool": {
                        "should": [
                            { "wildcard": { "host.keyword": contains_lower } },
                            { "wildcard": { "status_code.keyword": contains } },
                            { "wildcard": { "url.keyword": contains } }
                        ],
                        "minimum_should_match": 1,
                        "boost": WILDCARD_BOOST
                    }
                }
            ],
            "minimum_should_match": 1
        }
    })
}

fn term(field: &str, value: &str) -> Value {
    json!({ "term": { field: value } })
}

/// Filter clauses shared by the page, detail and export-style queries.
pub fn filter_clauses(filter: &FilterParams) -> Vec<Value> {
    let mut must = Vec::new();

    if let Some(search) = filter.search.as_deref() {
        must.push(tiered_search(search));
    }
    if let Some(domain) = filter.domain.as_deref() {
        must.push(term("flag_domain.keyword", domain));
    }
    if let Some(status) = filter.status.as_deref() {
        must.push(term("status.keyword", status));
    }
    match filter.urls.as_slice() {
        [] => {}
        [url] => must.push(term("url.keyword", url)),
        urls => must.push(json!({ "terms": { "url.keyword": urls } })),
    }
    if let Some(validation) = filter.validation.as_deref() {
        must.push(term("validation.keyword", validation));
    }
    if let Some(severity) = filter.severity.as_deref() {
        must.push(term("severity.keyword", severity));
    }
    if let Some(days) = filter.period_days {
        must.push(json!({
            "range": {
                "time": {
                    "gte": format!("now-{days}d"),
                    "lte": "now",
                    "format": "strict_date_optional_time"
                }
            }
        }));
    }

    must
}

/// Placeholder exclusions for the enumerated fields `filter` constrains.
/// Unfiltered fields keep their placeholder documents.
pub fn placeholder_exclusions(filter: &FilterParams) -> Vec<Value> {
    [
        ("severity.keyword", &filter.severity),
        ("status.keyword", &filter.status),
        ("validation.keyword", &filter.validation),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_some())
    .flat_map(|(field, _)| PLACEHOLDER_VALUES.iter().map(move |v| term(field, v)))
    .collect()
}

pub fn bool_query(filter: &FilterParams) -> Value {
    let mut query = json!({ "bool": { "must": filter_clauses(filter) } });
    let must_not = placeholder_exclusions(filter);
    if !must_not.is_empty() {
        query["bool"]["must_not"] = Value::Array(must_not);
    }
    query
}

/// One checklist page: two-part sort plus `search_after` on the cursor.
pub fn page_body(plan: &FetchPlan<'_>) -> Value {
    let mut body = json!({
        "size": plan.fetch_limit,
        "query": bool_query(plan.filter),
        "sort": [
            { "time": { "order": plan.order.as_str() } },
            { "id.keyword": { "order": plan.tie_order.as_str() } }
        ]
    });

    if let Some(findings_paging::Cursor::Composite { primary, id }) = plan.cursor {
        body["search_after"] = json!([primary, id]);
    }

    body
}

/// A single document by index `_id`, restricted to the caller's domain.
pub fn detail_body(doc_id: &str, domain: Option<&str>) -> Value {
    let mut must = vec![json!({ "ids": { "values": [doc_id] } })];
    if let Some(domain) = domain {
        must.push(term("flag_domain.keyword", domain));
    }
    json!({
        "size": 1,
        "query": { "bool": { "must": must } }
    })
}

/// Distinct URLs by frequency, fetching enough buckets to fill the page
/// ending at `bucket_count` plus one look-ahead.
pub fn url_terms_body(search: Option<&str>, domain: Option<&str>, bucket_count: usize) -> Value {
    let mut must = Vec::new();
    if let Some(domain) = domain {
        must.push(term("flag_domain.keyword", domain));
    }

    let mut terms = json!({
        "field": "url.keyword",
        "size": bucket_count,
        "order": { "_count": "desc" }
    });

    if let Some(search) = search {
        let lowered = search.to_lowercase();
        must.push(json!({
            "bool": {
                "should": [
                    { "term": { "url.keyword": { "value": search, "boost": 3.0 } } },
                    { "prefix": { "url.keyword": { "value": search, "boost": 2.0 } } },
                    {
                        "wildcard": {
                            "url.keyword": {
                                "value": format!("*{}*", escape_wildcard(&lowered)),
                                "boost": 1.0
                            }
                        }
                    }
                ],
                "minimum_should_match": 1
            }
        }));
        terms["include"] = json!(format!(".*{}.*", escape_regex(&lowered)));
    }

    json!({
        "size": 0,
        "query": { "bool": { "must": must } },
        "aggs": { "unique_urls": { "terms": terms } }
    })
}
