use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use findings_paging::RawListRequest;
use serde::Deserialize;

use crate::{api::response::Envelope, auth::AuthenticatedPrincipal, state::AppState, Result};

/// Query string of `GET /api/security-checklist/checklist-table`.
#[derive(Debug, Default, Deserialize)]
pub struct ChecklistParams {
    pub search: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub validation: Option<String>,
    pub urls: Option<String>,
    pub period: Option<String>,
    pub sort_order: Option<String>,
    pub size: Option<String>,
    pub last_page_id: Option<String>,
    pub last_page_time: Option<String>,
    pub direction: Option<String>,
}

impl From<ChecklistParams> for RawListRequest {
    fn from(q: ChecklistParams) -> Self {
        RawListRequest {
            search: q.search,
            severity: q.severity,
            status: q.status,
            validation: q.validation,
            urls: q.urls,
            period: q.period,
            sort_order: q.sort_order,
            limit: q.size,
            cursor_id: q.last_page_id,
            cursor_secondary: q.last_page_time,
            direction: q.direction,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UrlListParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub direction: Option<String>,
}

pub async fn checklist_table(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Query(query): Query<ChecklistParams>,
) -> Result<impl IntoResponse> {
    let page = state
        .checklist
        .list(&principal, &RawListRequest::from(query))
        .await?;
    Ok(Envelope::from_page(page))
}

pub async fn checklist_detail(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Path(doc_id): Path<String>,
) -> Result<impl IntoResponse> {
    let row = state.checklist.detail(&principal, &doc_id).await?;
    Ok(Envelope::ok(row))
}

pub async fn list_urls(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Query(query): Query<UrlListParams>,
) -> Result<impl IntoResponse> {
    let listing = state
        .checklist
        .urls(
            &principal,
            query.search.as_deref(),
            query.page.as_deref(),
            query.direction.as_deref(),
        )
        .await?;
    Ok(Envelope::ok(listing.urls)
        .with_page(listing.page)
        .with_pagination(listing.pagination))
}
