use findings_paging::{Cursor, PageRow, PaginationInfo};
use serde::{Deserialize, Serialize};

/// A proxy-traffic document from the security-checklist index.
///
/// `doc_id` is the index's own `_id`; `id` is the document field used as the
/// sort tie-breaker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistRow {
    pub doc_id: String,
    pub id: String,
    pub time: String,
    pub host: String,
    pub method: String,
    pub status_code: i64,
    pub tools: String,
    pub url: String,
    pub ip: String,
    pub pentester_name: String,
    pub severity: String,
    pub validation: String,
    pub status: String,
    pub vulnerability: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub response: String,
}

impl PageRow for ChecklistRow {
    fn identity(&self) -> String {
        self.id.clone()
    }

    fn cursor(&self) -> Cursor {
        Cursor::Composite {
            primary: self.time.clone(),
            id: self.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlBucket {
    pub url: String,
    pub count: u64,
}

/// One offset-addressed page of distinct URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlPage {
    pub urls: Vec<UrlBucket>,
    pub page: usize,
    pub pagination: PaginationInfo,
}
