//! Findings paging engine.
//!
//! Normalizes list requests, describes page boundaries as cursors and serves
//! stable, reversible pages over any store that can seek forward from a
//! cursor. Store adapters live in the server crate.

pub mod cursor;
pub mod engine;
pub mod error;
pub mod page;
pub mod params;

pub use cursor::{Cursor, CursorKind};
pub use engine::{assemble, paginate, FetchPlan, PageRow, PageSource, TieBreaker};
pub use error::{Error, Result};
pub use page::{Page, PaginationInfo};
pub use params::{
    normalize, Direction, ExportFormat, FilterParams, PageLimits, RawListRequest, SortOrder,
    TableSpec,
};
