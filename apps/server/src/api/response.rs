//! JSON response envelope shared by the listing endpoints.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use findings_paging::{Page, PaginationInfo};
use serde::Serialize;

pub const OK_MESSAGE: &str = "OK";

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: OK_MESSAGE.to_string(),
            data: Some(data),
            page: None,
            pagination: None,
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Page number, for offset-paged listings.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    pub fn from_page(page: Page<T>) -> Self {
        Self::ok(page.rows).with_pagination(page.pagination)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        response
    }
}
