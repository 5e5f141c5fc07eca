//! Typed search-index response shapes.
//!
//! Responses decode straight into these structs; a body that does not fit is
//! a store error rather than an empty result.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchResponse<T> {
    pub hits: Hits<T>,
    #[serde(default)]
    pub aggregations: Option<Aggregations>,
}

#[derive(Debug, Deserialize)]
pub struct Hits<T> {
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Hit<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct Aggregations {
    pub unique_urls: Option<TermsAggregation>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TermsAggregation {
    #[serde(default)]
    pub buckets: Vec<TermsBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermsBucket {
    pub key: String,
    pub doc_count: u64,
}

impl<T> SearchResponse<T> {
    /// Buckets of the URL terms aggregation, empty when absent.
    pub fn url_buckets(self) -> Vec<TermsBucket> {
        self.aggregations
            .and_then(|a| a.unique_urls)
            .map(|agg| agg.buckets)
            .unwrap_or_default()
    }
}
