use std::sync::Arc;

use findings_paging::{normalize, paginate, Direction, Page, PageLimits, RawListRequest};

use crate::{
    auth::Principal,
    config::PagingConfig,
    db::DomainResolver,
    models::{ChecklistRow, UrlPage},
    search_index::{urls, ChecklistStore, CHECKLIST_TABLE},
    services::caller_domain,
    Error, Result,
};

pub struct ChecklistService {
    store: Arc<dyn ChecklistStore>,
    domains: Arc<dyn DomainResolver>,
    limits: PageLimits,
    url_page_size: usize,
}

impl ChecklistService {
    pub fn new(
        store: Arc<dyn ChecklistStore>,
        domains: Arc<dyn DomainResolver>,
        paging: &PagingConfig,
    ) -> Self {
        Self {
            store,
            domains,
            limits: paging.limits(),
            url_page_size: paging.url_page_size,
        }
    }

    #[tracing::instrument(skip_all, fields(subject = %principal.subject))]
    pub async fn list(
        &self,
        principal: &Principal,
        raw: &RawListRequest,
    ) -> Result<Page<ChecklistRow>> {
        let filter = normalize(raw, &CHECKLIST_TABLE, self.limits)?;
        let domain = caller_domain(&self.domains, principal).await?;
        let filter = filter.with_domain(domain);

        let page = paginate(&*self.store, &filter).await?;
        if page.is_empty() && filter.is_first_page() {
            return Err(Error::NotFound("no checklist entries match the request".to_string()));
        }
        Ok(page)
    }

    #[tracing::instrument(skip_all, fields(subject = %principal.subject, doc_id))]
    pub async fn detail(&self, principal: &Principal, doc_id: &str) -> Result<ChecklistRow> {
        let doc_id = doc_id.trim();
        if doc_id.is_empty() {
            return Err(Error::Validation("document id must not be empty".to_string()));
        }
        let domain = caller_domain(&self.domains, principal).await?;

        self.store
            .find_by_id(doc_id, Some(&domain))
            .await?
            .ok_or_else(|| Error::NotFound(format!("checklist entry '{doc_id}' not found")))
    }

    /// One page of distinct URLs, most frequent first.
    #[tracing::instrument(skip_all, fields(subject = %principal.subject))]
    pub async fn urls(
        &self,
        principal: &Principal,
        search: Option<&str>,
        page: Option<&str>,
        direction: Option<&str>,
    ) -> Result<UrlPage> {
        let direction = match direction.map(str::trim).filter(|s| !s.is_empty()) {
            None => Direction::Next,
            Some(v) => Direction::parse(v)
                .ok_or_else(|| Error::Validation(format!("unknown paging direction '{v}'")))?,
        };
        let page = urls::resolve_page(page, direction)?;
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let domain = caller_domain(&self.domains, principal).await?;

        let buckets = self
            .store
            .url_buckets(search, Some(&domain), urls::bucket_count(page, self.url_page_size))
            .await?;
        let listing = urls::slice_page(buckets, page, self.url_page_size);
        if listing.urls.is_empty() {
            return Err(Error::NotFound(format!("no urls on page {page}")));
        }
        Ok(listing)
    }
}
