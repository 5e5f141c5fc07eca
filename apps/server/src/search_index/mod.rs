//! Search-index adapter for the security checklist.
//!
//! Pages seek with `search_after` on the composite `(time, id)` cursor.

mod checklist;
pub mod client;
pub mod models;
pub mod query;
pub mod urls;

pub use checklist::ElasticChecklistStore;
pub use client::{SearchError, SearchIndexClient};
pub use models::TermsBucket;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use findings_paging::{CursorKind, PageSource, TableSpec};

use crate::models::ChecklistRow;

pub const CHECKLIST_TABLE: TableSpec = TableSpec {
    name: "security checklist",
    sort_fields: &["time"],
    default_sort: "time",
    cursor_kind: CursorKind::Composite,
    cursor_primary: Some(is_index_timestamp),
};

/// Values the index accepts for `time` in `search_after`: an ISO-8601
/// datetime, with or without offset, or epoch milliseconds.
fn is_index_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || (!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()))
}

#[async_trait]
pub trait ChecklistStore: PageSource<Row = ChecklistRow> {
    /// Look up one document by its index `_id`, restricted to `domain`.
    async fn find_by_id(
        &self,
        doc_id: &str,
        domain: Option<&str>,
    ) -> findings_paging::Result<Option<ChecklistRow>>;

    /// The `bucket_count` most frequent URLs, optionally matching `search`.
    async fn url_buckets(
        &self,
        search: Option<&str>,
        domain: Option<&str>,
        bucket_count: usize,
    ) -> findings_paging::Result<Vec<TermsBucket>>;
}
