use async_trait::async_trait;
use findings_paging::{FetchPlan, PageSource, TieBreaker};

use crate::models::ChecklistRow;
use crate::search_index::client::SearchIndexClient;
use crate::search_index::models::{SearchResponse, TermsBucket};
use crate::search_index::{query, ChecklistStore};

/// Security-checklist documents served from the search index.
#[derive(Clone)]
pub struct ElasticChecklistStore {
    client: SearchIndexClient,
}

impl ElasticChecklistStore {
    pub fn new(client: SearchIndexClient) -> Self {
        Self { client }
    }

    fn rows(response: SearchResponse<ChecklistRow>) -> Vec<ChecklistRow> {
        response
            .hits
            .hits
            .into_iter()
            .map(|hit| ChecklistRow {
                doc_id: hit.id,
                ..hit.source
            })
            .collect()
    }
}

#[async_trait]
impl PageSource for ElasticChecklistStore {
    type Row = ChecklistRow;

    fn tie_breaker(&self) -> TieBreaker {
        TieBreaker::Ascending
    }

    async fn fetch(&self, plan: &FetchPlan<'_>) -> findings_paging::Result<Vec<ChecklistRow>> {
        let body = query::page_body(plan);
        tracing::debug!(size = plan.fetch_limit, "checklist page search");

        let response = self.client.search(&body).await.map_err(|e| {
            tracing::warn!(error = %e, "checklist page search failed");
            findings_paging::Error::store("fetch checklist page", e)
        })?;
        Ok(Self::rows(response))
    }
}

#[async_trait]
impl ChecklistStore for ElasticChecklistStore {
    async fn find_by_id(
        &self,
        doc_id: &str,
        domain: Option<&str>,
    ) -> findings_paging::Result<Option<ChecklistRow>> {
        let body = query::detail_body(doc_id, domain);
        let response = self.client.search(&body).await.map_err(|e| {
            tracing::warn!(error = %e, doc_id, "checklist detail search failed");
            findings_paging::Error::store("fetch checklist detail", e)
        })?;
        Ok(Self::rows(response).into_iter().next())
    }

    async fn url_buckets(
        &self,
        search: Option<&str>,
        domain: Option<&str>,
        bucket_count: usize,
    ) -> findings_paging::Result<Vec<TermsBucket>> {
        let body = query::url_terms_body(search, domain, bucket_count);
        let response = self
            .client
            .search::<serde_json::Value>(&body)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "url aggregation failed");
                findings_paging::Error::store("aggregate checklist urls", e)
            })?;
        Ok(response.url_buckets())
    }
}
