//! Storage seams used by the services.
//!
//! Paging itself goes through `findings_paging::PageSource`; these traits add
//! what a listing needs beyond a single page.

use async_trait::async_trait;
use findings_paging::{FilterParams, PageSource};

use crate::{models::FindingRow, Result};

#[async_trait]
pub trait FindingStore: PageSource<Row = FindingRow> {
    /// Every row matching `filter` in display order.
    ///
    /// # Errors
    /// `Export` when more than `max_rows` rows match; nothing is returned in
    /// that case.
    async fn export_rows(
        &self,
        filter: &FilterParams,
        max_rows: usize,
    ) -> findings_paging::Result<Vec<FindingRow>>;
}

/// Maps an authenticated subject to the domain its listings are scoped to.
#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// `Ok(None)` when the subject has no client or the client has no domain.
    async fn resolve(&self, subject: &str) -> Result<Option<String>>;
}
