use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use findings_paging::RawListRequest;
use serde::Deserialize;

use crate::{
    api::response::Envelope,
    auth::AuthenticatedPrincipal,
    export::export_filename,
    services::FindingsListing,
    state::AppState,
    Result,
};

/// Query string of `GET /api/findings`.
#[derive(Debug, Default, Deserialize)]
pub struct FindingsParams {
    pub search: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub validation: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub last_id: Option<String>,
    pub direction: Option<String>,
    pub export: Option<String>,
    pub period: Option<String>,
}

impl From<FindingsParams> for RawListRequest {
    fn from(q: FindingsParams) -> Self {
        RawListRequest {
            search: q.search,
            severity: q.severity,
            status: q.status,
            validation: q.validation,
            period: q.period,
            sort_by: q.sort_by,
            sort_order: q.sort_order,
            limit: q.limit,
            cursor_id: q.last_id,
            direction: q.direction,
            export: q.export,
            ..Default::default()
        }
    }
}

/// List findings, or download them as CSV with `export=csv`.
pub async fn list_findings(
    State(state): State<AppState>,
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    Query(query): Query<FindingsParams>,
) -> Result<Response> {
    let raw = RawListRequest::from(query);

    match state.findings.list(&principal, &raw).await? {
        FindingsListing::Page(page) => Ok(Envelope::from_page(page).into_response()),
        FindingsListing::Csv { body, .. } => Ok(csv_response(body)),
    }
}

fn csv_response(body: String) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(chrono::Utc::now())
    );

    let mut response = body.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}
