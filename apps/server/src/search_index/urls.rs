//! Offset paging over the distinct-URL aggregation.
//!
//! Terms aggregations cannot seek, so URL listings are page-numbered: the
//! store returns the top `offset + page_size + 1` buckets and the page is
//! sliced out here.

use findings_paging::{Direction, PaginationInfo};

use crate::models::{UrlBucket, UrlPage};
use crate::search_index::models::TermsBucket;
use crate::{Error, Result};

/// Resolve the page to serve from the client's current page and direction.
///
/// A missing page counts as page zero, so the first `next` lands on page 1.
pub fn resolve_page(page: Option<&str>, direction: Direction) -> Result<usize> {
    let current = match page.map(str::trim).filter(|s| !s.is_empty()) {
        None => 0,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| Error::Validation(format!("page '{raw}' is not a page number")))?,
    };

    let target = match direction {
        Direction::Next => current.saturating_add(1),
        Direction::Previous if current > 1 => current - 1,
        Direction::Previous => current,
    };
    Ok(target.max(1))
}

/// Number of buckets to request for `page`, one past its end.
pub fn bucket_count(page: usize, page_size: usize) -> usize {
    offset(page, page_size)
        .saturating_add(page_size)
        .saturating_add(1)
}

fn offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

pub fn slice_page(buckets: Vec<TermsBucket>, page: usize, page_size: usize) -> UrlPage {
    let start = offset(page, page_size);
    let has_next = buckets.len() > start.saturating_add(page_size);

    let urls: Vec<UrlBucket> = buckets
        .into_iter()
        .skip(start)
        .take(page_size)
        .map(|b| UrlBucket {
            url: b.key,
            count: b.doc_count,
        })
        .collect();

    UrlPage {
        pagination: PaginationInfo {
            size: urls.len(),
            has_next,
            has_previous: page > 1,
        },
        urls,
        page,
    }
}
