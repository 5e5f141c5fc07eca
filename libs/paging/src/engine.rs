//! Backend-agnostic bidirectional cursor pagination.
//!
//! Neither store can seek backward, so a `previous` request asks the store to
//! seek forward from the cursor in the inverted order and the result is
//! reversed back into display order. One extra row is fetched to learn
//! whether more rows exist; no COUNT is ever issued.

use async_trait::async_trait;

use crate::cursor::Cursor;
use crate::error::Result;
use crate::page::Page;
use crate::params::{FilterParams, SortOrder};

/// A row a page can be built from.
pub trait PageRow {
    /// Stable identity, compared against `Cursor::id`.
    fn identity(&self) -> String;

    /// Cursor addressing this row as a page boundary.
    fn cursor(&self) -> Cursor;
}

/// How a store orders its tie-breaking key relative to the primary sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreaker {
    /// Identity sorts in the same order as the primary key.
    FollowPrimary,
    /// Identity sorts ascending on forward pages regardless of the primary key.
    Ascending,
}

/// What a store must fetch for one page request.
#[derive(Debug, Clone)]
pub struct FetchPlan<'a> {
    pub filter: &'a FilterParams,
    /// Effective primary order, already inverted for backward paging.
    pub order: SortOrder,
    /// Effective tie-breaker order, already inverted for backward paging.
    pub tie_order: SortOrder,
    pub cursor: Option<&'a Cursor>,
    /// Always one more than the page size.
    pub fetch_limit: usize,
}

impl<'a> FetchPlan<'a> {
    pub fn new(filter: &'a FilterParams, tie_breaker: TieBreaker) -> Self {
        let reverse = filter.direction.is_reverse();
        let forward_tie = match tie_breaker {
            TieBreaker::FollowPrimary => filter.sort_order,
            TieBreaker::Ascending => SortOrder::Asc,
        };
        let (order, tie_order) = if reverse {
            (filter.sort_order.invert(), forward_tie.invert())
        } else {
            (filter.sort_order, forward_tie)
        };

        Self {
            filter,
            order,
            tie_order,
            cursor: filter.cursor.as_ref(),
            fetch_limit: filter.limit.saturating_add(1),
        }
    }
}

/// A store that can seek forward from a cursor in a given order.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Row: PageRow + Send;

    fn tie_breaker(&self) -> TieBreaker;

    /// Fetch up to `plan.fetch_limit` rows strictly after `plan.cursor`, in
    /// `plan.order` then `plan.tie_order`.
    async fn fetch(&self, plan: &FetchPlan<'_>) -> Result<Vec<Self::Row>>;
}

/// Serve one page from `source`.
pub async fn paginate<S>(source: &S, filter: &FilterParams) -> Result<Page<S::Row>>
where
    S: PageSource + ?Sized,
{
    // Paging backward without a boundary means there is nothing before us.
    if filter.direction.is_reverse() && filter.cursor.is_none() {
        return Ok(Page::at_start());
    }

    let plan = FetchPlan::new(filter, source.tie_breaker());
    tracing::debug!(
        direction = filter.direction.as_str(),
        order = plan.order.as_str(),
        tie_order = plan.tie_order.as_str(),
        fetch_limit = plan.fetch_limit,
        has_cursor = plan.cursor.is_some(),
        "fetching page"
    );

    let fetched = source.fetch(&plan).await?;
    Ok(assemble(fetched, filter))
}

/// Turn the rows of a `limit + 1` fetch into a page in display order.
pub fn assemble<R: PageRow>(mut rows: Vec<R>, filter: &FilterParams) -> Page<R> {
    let limit = filter.limit;
    let reverse = filter.direction.is_reverse();

    if reverse {
        rows.reverse();

        // The store re-surfaced the boundary row itself: already at the start.
        if let Some(cursor) = &filter.cursor {
            let boundary = cursor.id();
            if rows.iter().any(|r| r.identity() == boundary) {
                return Page::at_start();
            }
        }
    }

    let has_more = rows.len() > limit;
    if has_more {
        if reverse {
            // After reversal the surplus row is the one furthest from the cursor.
            let surplus = rows.len() - limit;
            rows.drain(..surplus);
        } else {
            rows.truncate(limit);
        }
    }

    if !reverse {
        let has_previous = filter.cursor.is_some();
        return Page::new(rows, has_more, has_previous);
    }

    if rows.is_empty() {
        return Page::at_start();
    }
    Page::new(rows, true, has_more)
}
