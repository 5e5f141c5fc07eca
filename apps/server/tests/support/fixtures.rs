use chrono::{Duration, TimeZone, Utc};
use findings_server::models::{ChecklistRow, FindingRow};

/// A checklist document and the domain it belongs to.
#[derive(Debug, Clone)]
pub struct Doc {
    pub domain: String,
    pub row: ChecklistRow,
}

/// Finding `id`, created `id` hours after a fixed epoch.
pub fn finding(id: i64, domain: &str) -> FindingRow {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(id);
    let severities = ["HIGH", "LOW", "MEDIUM", "CRITICAL"];
    FindingRow {
        id,
        host: format!("app{id}.{domain}"),
        method: "GET".into(),
        status_code: 200,
        tool: "scanner".into(),
        url: format!("https://{domain}/path/{id}"),
        pentester_ip: "10.0.0.5".into(),
        severity: severities[(id as usize) % severities.len()].into(),
        status: "OPEN".into(),
        vulnerability: "xss".into(),
        validation: "VALIDATED".into(),
        flag_domain: Some(domain.into()),
        created_at,
        updated_at: created_at,
        name_bug: Some(format!("Bug {id}")),
        type_bug: Some("Injection".into()),
        description_bug: Some("Unsanitized input, reflected".into()),
    }
}

pub fn findings(ids: std::ops::RangeInclusive<i64>, domain: &str) -> Vec<FindingRow> {
    ids.map(|id| finding(id, domain)).collect()
}

pub fn doc(doc_id: &str, id: &str, time: &str, url: &str, domain: &str) -> Doc {
    Doc {
        domain: domain.into(),
        row: ChecklistRow {
            doc_id: doc_id.into(),
            id: id.into(),
            time: time.into(),
            host: domain.into(),
            method: "GET".into(),
            status_code: 200,
            url: url.into(),
            severity: "HIGH".into(),
            validation: "VALIDATED".into(),
            status: "OPEN".into(),
            ..Default::default()
        },
    }
}

/// Seven documents for `example.com`; several share a timestamp.
pub fn checklist_docs() -> Vec<Doc> {
    let times = [
        "2024-05-01T08:00:00Z",
        "2024-05-01T08:00:00Z",
        "2024-05-01T09:30:00Z",
        "2024-05-02T11:00:00Z",
        "2024-05-02T11:00:00Z",
        "2024-05-02T11:00:00Z",
        "2024-05-03T07:15:00Z",
    ];
    times
        .iter()
        .enumerate()
        .map(|(i, t)| {
            doc(
                &format!("es-{i}"),
                &format!("f-{i}"),
                t,
                &format!("https://example.com/page/{}", i % 3),
                super::DOMAIN,
            )
        })
        .collect()
}
