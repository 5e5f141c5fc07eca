use serde::Serialize;

/// Pagination flags derived without counting rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PaginationInfo {
    pub size: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// One page of rows in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T> Page<T> {
    pub fn new(rows: Vec<T>, has_next: bool, has_previous: bool) -> Self {
        let pagination = PaginationInfo {
            size: rows.len(),
            has_next,
            has_previous,
        };
        Self { rows, pagination }
    }

    /// The empty page returned when paging backward past the first row.
    pub fn at_start() -> Self {
        Self::new(Vec::new(), true, false)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
