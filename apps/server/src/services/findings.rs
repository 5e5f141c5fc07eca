use std::sync::Arc;

use findings_paging::{normalize, paginate, Page, PageLimits, RawListRequest};

use crate::{
    auth::Principal,
    config::PagingConfig,
    db::{DomainResolver, FindingStore, FINDINGS_TABLE},
    export,
    models::FindingRow,
    services::caller_domain,
    Error, Result,
};

/// Result of a findings request: a page, or a rendered export.
#[derive(Debug)]
pub enum FindingsListing {
    Page(Page<FindingRow>),
    Csv { body: String, rows: usize },
}

pub struct FindingsService {
    store: Arc<dyn FindingStore>,
    domains: Arc<dyn DomainResolver>,
    limits: PageLimits,
    export_max_rows: usize,
}

impl FindingsService {
    pub fn new(
        store: Arc<dyn FindingStore>,
        domains: Arc<dyn DomainResolver>,
        paging: &PagingConfig,
    ) -> Self {
        Self {
            store,
            domains,
            limits: paging.limits(),
            export_max_rows: paging.export_max_rows,
        }
    }

    #[tracing::instrument(skip_all, fields(subject = %principal.subject))]
    pub async fn list(
        &self,
        principal: &Principal,
        raw: &RawListRequest,
    ) -> Result<FindingsListing> {
        let filter = normalize(raw, &FINDINGS_TABLE, self.limits)?;
        let domain = caller_domain(&self.domains, principal).await?;
        let filter = filter.with_domain(domain);

        if filter.is_export() {
            let rows = self.store.export_rows(&filter, self.export_max_rows).await?;
            tracing::info!(rows = rows.len(), "findings exported");
            let body = export::findings_csv(&rows)?;
            return Ok(FindingsListing::Csv {
                body,
                rows: rows.len(),
            });
        }

        let page = paginate(&*self.store, &filter).await?;
        if page.is_empty() && filter.is_first_page() {
            return Err(Error::NotFound("no findings match the request".to_string()));
        }

        tracing::debug!(
            size = page.pagination.size,
            has_next = page.pagination.has_next,
            has_previous = page.pagination.has_previous,
            "findings page served"
        );
        Ok(FindingsListing::Page(page))
    }
}
