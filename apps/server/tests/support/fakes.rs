//! In-memory stores with the same ordering contracts as the real adapters.

use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use findings_paging::{Cursor, FetchPlan, FilterParams, PageSource, SortOrder, TieBreaker};
use findings_server::{
    db::{DomainResolver, FindingStore},
    models::{ChecklistRow, FindingRow},
    search_index::{ChecklistStore, TermsBucket},
};

use super::fixtures::Doc;

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    if order.is_ascending() {
        ordering
    } else {
        ordering.reverse()
    }
}

fn matches_text(value: &str, wanted: Option<&str>) -> bool {
    wanted.map_or(true, |w| value == w)
}

pub struct FakeFindingStore {
    rows: Vec<FindingRow>,
}

impl FakeFindingStore {
    pub fn new(rows: Vec<FindingRow>) -> Self {
        Self { rows }
    }

    fn matching(&self, filter: &FilterParams) -> Vec<FindingRow> {
        self.rows
            .iter()
            .filter(|r| r.flag_domain.as_deref() == filter.domain.as_deref())
            .filter(|r| matches_text(&r.severity, filter.severity.as_deref()))
            .filter(|r| matches_text(&r.status, filter.status.as_deref()))
            .filter(|r| matches_text(&r.validation, filter.validation.as_deref()))
            .filter(|r| {
                filter
                    .search
                    .as_deref()
                    .map_or(true, |s| r.url.to_lowercase().contains(&s.to_lowercase()))
            })
            .cloned()
            .collect()
    }

    fn sort(rows: &mut [FindingRow], order: SortOrder, tie_order: SortOrder) {
        rows.sort_by(|a, b| {
            directed(a.created_at.cmp(&b.created_at), order)
                .then_with(|| directed(a.id.cmp(&b.id), tie_order))
        });
    }
}

#[async_trait]
impl PageSource for FakeFindingStore {
    type Row = FindingRow;

    fn tie_breaker(&self) -> TieBreaker {
        TieBreaker::FollowPrimary
    }

    async fn fetch(&self, plan: &FetchPlan<'_>) -> findings_paging::Result<Vec<FindingRow>> {
        let mut rows: Vec<FindingRow> = self
            .matching(plan.filter)
            .into_iter()
            .filter(|r| match plan.cursor.and_then(Cursor::as_ordinal) {
                None => true,
                Some(c) if plan.tie_order.is_ascending() => r.id > c,
                Some(c) => r.id < c,
            })
            .collect();
        Self::sort(&mut rows, plan.order, plan.tie_order);
        rows.truncate(plan.fetch_limit);
        Ok(rows)
    }
}

#[async_trait]
impl FindingStore for FakeFindingStore {
    async fn export_rows(
        &self,
        filter: &FilterParams,
        max_rows: usize,
    ) -> findings_paging::Result<Vec<FindingRow>> {
        let mut rows = self.matching(filter);
        if rows.len() > max_rows {
            return Err(findings_paging::Error::export(format!(
                "export matches more than {max_rows} rows"
            )));
        }
        Self::sort(&mut rows, filter.sort_order, filter.sort_order);
        Ok(rows)
    }
}

pub struct FakeChecklistStore {
    docs: Vec<Doc>,
}

impl FakeChecklistStore {
    pub fn new(docs: Vec<Doc>) -> Self {
        Self { docs }
    }

    fn in_domain<'a>(
        &'a self,
        domain: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ChecklistRow> + 'a {
        self.docs
            .iter()
            .filter(move |d| domain.map_or(true, |dom| d.domain == dom))
            .map(|d| &d.row)
    }
}

fn compare(a: (&str, &str), b: (&str, &str), plan: &FetchPlan<'_>) -> Ordering {
    directed(a.0.cmp(b.0), plan.order).then_with(|| directed(a.1.cmp(b.1), plan.tie_order))
}

#[async_trait]
impl PageSource for FakeChecklistStore {
    type Row = ChecklistRow;

    fn tie_breaker(&self) -> TieBreaker {
        TieBreaker::Ascending
    }

    async fn fetch(&self, plan: &FetchPlan<'_>) -> findings_paging::Result<Vec<ChecklistRow>> {
        let filter = plan.filter;
        let mut rows: Vec<ChecklistRow> = self
            .in_domain(filter.domain.as_deref())
            .filter(|r| matches_text(&r.severity, filter.severity.as_deref()))
            .filter(|r| matches_text(&r.status, filter.status.as_deref()))
            .filter(|r| filter.urls.is_empty() || filter.urls.contains(&r.url))
            .filter(|r| match plan.cursor {
                Some(Cursor::Composite { primary, id }) => {
                    compare(
                        (r.time.as_str(), r.id.as_str()),
                        (primary.as_str(), id.as_str()),
                        plan,
                    ) == Ordering::Greater
                }
                _ => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            compare(
                (a.time.as_str(), a.id.as_str()),
                (b.time.as_str(), b.id.as_str()),
                plan,
            )
        });
        rows.truncate(plan.fetch_limit);
        Ok(rows)
    }
}

#[async_trait]
impl ChecklistStore for FakeChecklistStore {
    async fn find_by_id(
        &self,
        doc_id: &str,
        domain: Option<&str>,
    ) -> findings_paging::Result<Option<ChecklistRow>> {
        Ok(self.in_domain(domain).find(|r| r.doc_id == doc_id).cloned())
    }

    async fn url_buckets(
        &self,
        search: Option<&str>,
        domain: Option<&str>,
        bucket_count: usize,
    ) -> findings_paging::Result<Vec<TermsBucket>> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for row in self.in_domain(domain) {
            let wanted =
                search.map_or(true, |s| row.url.to_lowercase().contains(&s.to_lowercase()));
            if wanted {
                *counts.entry(row.url.as_str()).or_default() += 1;
            }
        }

        let mut buckets: Vec<TermsBucket> = counts
            .into_iter()
            .map(|(key, doc_count)| TermsBucket {
                key: key.to_string(),
                doc_count,
            })
            .collect();
        buckets.sort_by(|a, b| b.doc_count.cmp(&a.doc_count).then_with(|| a.key.cmp(&b.key)));
        buckets.truncate(bucket_count);
        Ok(buckets)
    }
}

pub struct FakeDomains {
    domains: HashMap<String, String>,
}

impl FakeDomains {
    pub fn new<const N: usize>(pairs: [(&str, &str); N]) -> Self {
        Self {
            domains: pairs
                .into_iter()
                .map(|(s, d)| (s.to_string(), d.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl DomainResolver for FakeDomains {
    async fn resolve(&self, subject: &str) -> findings_server::Result<Option<String>> {
        Ok(self.domains.get(subject).cloned())
    }
}
