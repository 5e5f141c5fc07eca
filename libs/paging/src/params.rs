//! Raw list request parsing and normalization.
//!
//! `normalize` is a pure transform from the loosely typed query-string shape
//! into a validated `FilterParams`. Out-of-range numbers are clamped, not
//! rejected; only structurally malformed values fail.

use serde::{Deserialize, Serialize};

use crate::cursor::{Cursor, CursorKind};
use crate::error::{Error, Result};

/// Sentinel that clears any categorical filter.
const SENTINEL_ALL: &str = "all";

/// Sort order as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Accepts `asc`/`desc` and the dashboard aliases `oldest`/`newest`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "oldest" => Some(Self::Asc),
            "desc" | "newest" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn invert(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Asc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

impl Direction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "next" => Some(Self::Next),
            "prev" | "previous" => Some(Self::Previous),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, Self::Previous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        value
            .trim()
            .eq_ignore_ascii_case("csv")
            .then_some(Self::Csv)
    }
}

/// Static description of a listable table: which sort fields it allows and
/// which cursor representation it pages with.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub sort_fields: &'static [&'static str],
    pub default_sort: &'static str,
    pub cursor_kind: CursorKind,
    /// Accepts or rejects the primary sort value of a composite cursor.
    pub cursor_primary: Option<fn(&str) -> bool>,
}

impl TableSpec {
    fn cursor(&self, id: Option<&str>, secondary: Option<&str>) -> Result<Option<Cursor>> {
        let cursor = Cursor::parse(self.cursor_kind, id, secondary)?;
        if let (Some(Cursor::Composite { primary, .. }), Some(accepts)) =
            (&cursor, self.cursor_primary)
        {
            if !accepts(primary) {
                return Err(Error::validation(format!(
                    "cursor sort value '{primary}' is malformed for {}",
                    self.name
                )));
            }
        }
        Ok(cursor)
    }

    fn sort_field(&self, requested: Option<&str>) -> Result<&'static str> {
        let Some(requested) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(self.default_sort);
        };
        self.sort_fields
            .iter()
            .copied()
            .find(|f| f.eq_ignore_ascii_case(requested))
            .ok_or_else(|| {
                Error::validation(format!(
                    "unsupported sort field '{requested}' for {}",
                    self.name
                ))
            })
    }
}

/// Page-size bounds applied during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// A list request as it arrives from the transport, every field optional text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawListRequest {
    pub search: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub validation: Option<String>,
    pub urls: Option<String>,
    pub period: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub cursor_id: Option<String>,
    pub cursor_secondary: Option<String>,
    pub direction: Option<String>,
    pub export: Option<String>,
}

/// Normalized, validated description of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub search: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub validation: Option<String>,
    /// Tenant scope; filled in from the caller's identity, never from the query.
    pub domain: Option<String>,
    pub urls: Vec<String>,
    pub period_days: Option<u32>,
    pub sort_by: &'static str,
    pub sort_order: SortOrder,
    pub limit: usize,
    pub cursor: Option<Cursor>,
    pub direction: Direction,
    pub export: Option<ExportFormat>,
}

impl FilterParams {
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// First page of a chain: no cursor, paging forward.
    pub fn is_first_page(&self) -> bool {
        self.cursor.is_none() && !self.direction.is_reverse()
    }

    pub fn is_export(&self) -> bool {
        self.export.is_some()
    }
}

pub fn normalize(
    raw: &RawListRequest,
    table: &TableSpec,
    limits: PageLimits,
) -> Result<FilterParams> {
    let direction = match non_empty(raw.direction.as_deref()) {
        None => Direction::Next,
        Some(v) => Direction::parse(v)
            .ok_or_else(|| Error::validation(format!("unknown paging direction '{v}'")))?,
    };

    let export = match non_empty(raw.export.as_deref()) {
        None => None,
        Some(v) => Some(
            ExportFormat::parse(v)
                .ok_or_else(|| Error::validation(format!("unsupported export format '{v}'")))?,
        ),
    };

    // Unrecognized orders fall back to newest-first.
    let sort_order = non_empty(raw.sort_order.as_deref())
        .and_then(SortOrder::parse)
        .unwrap_or_default();

    Ok(FilterParams {
        search: non_empty(raw.search.as_deref()).map(str::to_string),
        severity: categorical(raw.severity.as_deref(), "severity"),
        status: categorical(raw.status.as_deref(), "status"),
        validation: categorical(raw.validation.as_deref(), "validation"),
        domain: None,
        urls: split_urls(raw.urls.as_deref()),
        period_days: parse_period(raw.period.as_deref())?,
        sort_by: table.sort_field(raw.sort_by.as_deref())?,
        sort_order,
        limit: parse_limit(raw.limit.as_deref(), limits)?,
        cursor: table.cursor(raw.cursor_id.as_deref(), raw.cursor_secondary.as_deref())?,
        direction,
        export,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Trims and uppercases an enumerated filter; `all` / `all_<field>` clear it.
fn categorical(value: Option<&str>, field: &str) -> Option<String> {
    let value = non_empty(value)?;
    let lowered = value.to_ascii_lowercase();
    if lowered == SENTINEL_ALL || lowered == format!("{SENTINEL_ALL}_{field}") {
        return None;
    }
    Some(value.to_uppercase())
}

fn split_urls(value: Option<&str>) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    let Some(value) = value else {
        return urls;
    };
    for url in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    urls
}

fn parse_limit(value: Option<&str>, limits: PageLimits) -> Result<usize> {
    let Some(value) = non_empty(value) else {
        return Ok(limits.default_limit);
    };
    let parsed = value
        .parse::<i64>()
        .map_err(|_| Error::validation(format!("page size '{value}' is not an integer")))?;
    if parsed <= 0 {
        return Ok(limits.default_limit);
    }
    Ok(usize::try_from(parsed)
        .unwrap_or(usize::MAX)
        .min(limits.max_limit))
}

fn parse_period(value: Option<&str>) -> Result<Option<u32>> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };
    let days = value
        .parse::<u32>()
        .map_err(|_| Error::validation(format!("period '{value}' is not a day count")))?;
    Ok((days > 0).then_some(days))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: TableSpec = TableSpec {
        name: "findings",
        sort_fields: &["created_at", "severity", "id"],
        default_sort: "created_at",
        cursor_kind: CursorKind::Ordinal,
        cursor_primary: None,
    };

    const TIMELINE: TableSpec = TableSpec {
        name: "timeline",
        sort_fields: &["time"],
        default_sort: "time",
        cursor_kind: CursorKind::Composite,
        cursor_primary: Some(is_digits),
    };

    fn is_digits(value: &str) -> bool {
        value.chars().all(|c| c.is_ascii_digit())
    }

    fn normalize_default(raw: RawListRequest) -> Result<FilterParams> {
        normalize(&raw, &TABLE, PageLimits::default())
    }

    #[test]
    fn empty_request_gets_defaults() {
        let params = normalize_default(RawListRequest::default()).unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.sort_by, "created_at");
        assert_eq!(params.sort_order, SortOrder::Desc);
        assert_eq!(params.direction, Direction::Next);
        assert!(params.cursor.is_none());
        assert!(params.is_first_page());
        assert!(!params.is_export());
    }

    #[test]
    fn sort_order_aliases() {
        for (raw, expected) in [
            ("oldest", SortOrder::Asc),
            ("newest", SortOrder::Desc),
            ("ASC", SortOrder::Asc),
            ("sideways", SortOrder::Desc),
        ] {
            let params = normalize_default(RawListRequest {
                sort_order: Some(raw.into()),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(params.sort_order, expected, "sort_order={raw}");
        }
    }

    #[test]
    fn categorical_filters_are_uppercased() {
        let params = normalize_default(RawListRequest {
            severity: Some(" high ".into()),
            status: Some("open".into()),
            validation: Some("Valid".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.severity.as_deref(), Some("HIGH"));
        assert_eq!(params.status.as_deref(), Some("OPEN"));
        assert_eq!(params.validation.as_deref(), Some("VALID"));
    }

    #[test]
    fn sentinels_clear_filters() {
        let params = normalize_default(RawListRequest {
            severity: Some("all_severity".into()),
            status: Some("ALL".into()),
            validation: Some("All_Validation".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.severity, None);
        assert_eq!(params.status, None);
        assert_eq!(params.validation, None);

        // A sentinel for another field is an ordinary value.
        let params = normalize_default(RawListRequest {
            severity: Some("all_status".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.severity.as_deref(), Some("ALL_STATUS"));
    }

    #[test]
    fn limit_is_clamped_not_rejected() {
        let limit = |raw: &str| {
            normalize_default(RawListRequest {
                limit: Some(raw.into()),
                ..Default::default()
            })
            .map(|p| p.limit)
        };
        assert_eq!(limit("0").unwrap(), 10);
        assert_eq!(limit("-5").unwrap(), 10);
        assert_eq!(limit("25").unwrap(), 25);
        assert_eq!(limit("100000").unwrap(), 100);
        assert!(limit("ten").unwrap_err().is_validation());
    }

    #[test]
    fn unknown_sort_field_is_rejected() {
        let err = normalize_default(RawListRequest {
            sort_by: Some("created_at; DROP TABLE list_bugs".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.is_validation());

        let params = normalize_default(RawListRequest {
            sort_by: Some("SEVERITY".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.sort_by, "severity");
    }

    #[test]
    fn direction_and_export_are_validated() {
        let params = normalize_default(RawListRequest {
            direction: Some("prev".into()),
            cursor_id: Some("7".into()),
            export: Some("CSV".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.direction, Direction::Previous);
        assert_eq!(params.cursor, Some(Cursor::Ordinal(7)));
        assert_eq!(params.export, Some(ExportFormat::Csv));
        assert!(!params.is_first_page());

        assert!(normalize_default(RawListRequest {
            direction: Some("sideways".into()),
            ..Default::default()
        })
        .unwrap_err()
        .is_validation());
        assert!(normalize_default(RawListRequest {
            export: Some("xlsx".into()),
            ..Default::default()
        })
        .unwrap_err()
        .is_validation());
    }

    #[test]
    fn urls_are_split_trimmed_and_deduplicated() {
        let params = normalize_default(RawListRequest {
            urls: Some(" https://a.test/x ,,https://b.test, https://a.test/x".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(params.urls, vec!["https://a.test/x", "https://b.test"]);
    }

    #[test]
    fn period_zero_means_unbounded() {
        let period = |raw: &str| {
            normalize_default(RawListRequest {
                period: Some(raw.into()),
                ..Default::default()
            })
            .map(|p| p.period_days)
        };
        assert_eq!(period("0").unwrap(), None);
        assert_eq!(period("30").unwrap(), Some(30));
        assert!(period("-1").unwrap_err().is_validation());
    }

    #[test]
    fn composite_cursor_sort_value_is_checked() {
        let cursor = |time: &str| {
            normalize(
                &RawListRequest {
                    cursor_id: Some("doc-3".into()),
                    cursor_secondary: Some(time.into()),
                    ..Default::default()
                },
                &TIMELINE,
                PageLimits::default(),
            )
            .map(|p| p.cursor)
        };
        assert_eq!(
            cursor("1714550400000").unwrap(),
            Some(Cursor::Composite {
                primary: "1714550400000".into(),
                id: "doc-3".into()
            })
        );
        assert!(cursor("garbage").unwrap_err().is_validation());
    }
}
