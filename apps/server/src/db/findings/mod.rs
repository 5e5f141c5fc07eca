//! Relational adapter for the findings table.
//!
//! Pages seek on the ordinal `list_bugs.id`; the identity always follows the
//! primary sort direction. Only columns that order the same way as `id` are
//! sortable, otherwise a seek on `id` alone would skip rows.

mod bind;
mod query_builder;

pub use query_builder::FindingsQuery;

use async_trait::async_trait;
use findings_paging::{CursorKind, FetchPlan, FilterParams, PageSource, TableSpec, TieBreaker};
use sqlx::PgPool;

use crate::db::traits::FindingStore;
use crate::models::FindingRow;

pub const FINDINGS_TABLE: TableSpec = TableSpec {
    name: "findings",
    sort_fields: &["created_at", "id"],
    default_sort: "created_at",
    cursor_kind: CursorKind::Ordinal,
    cursor_primary: None,
};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    BigInt(i64),
    Int(i32),
}

#[derive(Clone)]
pub struct PostgresFindingStore {
    pool: PgPool,
}

impl PostgresFindingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run(&self, query: FindingsQuery<'_>) -> Result<Vec<FindingRow>, sqlx::Error> {
        let (sql, bind_values) = query.build_sql();
        tracing::debug!(sql = %sql, binds = bind_values.len(), "findings query");

        let mut query = sqlx::query_as::<_, FindingRow>(&sql);
        for value in bind_values {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::TextArray(vs) => query.bind(vs),
                BindValue::BigInt(v) => query.bind(v),
                BindValue::Int(v) => query.bind(v),
            };
        }
        query.fetch_all(&self.pool).await
    }
}

#[async_trait]
impl PageSource for PostgresFindingStore {
    type Row = FindingRow;

    fn tie_breaker(&self) -> TieBreaker {
        TieBreaker::FollowPrimary
    }

    async fn fetch(&self, plan: &FetchPlan<'_>) -> findings_paging::Result<Vec<FindingRow>> {
        self.run(FindingsQuery::page(plan)).await.map_err(|e| {
            tracing::warn!(error = %e, "findings page query failed");
            findings_paging::Error::store("fetch findings page", e)
        })
    }
}

#[async_trait]
impl FindingStore for PostgresFindingStore {
    async fn export_rows(
        &self,
        filter: &FilterParams,
        max_rows: usize,
    ) -> findings_paging::Result<Vec<FindingRow>> {
        // One row past the cap tells an oversized export apart from an exact fit.
        let query = FindingsQuery::export(filter, max_rows.saturating_add(1));
        let rows = self.run(query).await.map_err(|e| {
            tracing::warn!(error = %e, "findings export query failed");
            findings_paging::Error::store("export findings", e)
        })?;

        if rows.len() > max_rows {
            return Err(findings_paging::Error::export(format!(
                "export matches more than {max_rows} rows; narrow the filter"
            )));
        }
        Ok(rows)
    }
}
