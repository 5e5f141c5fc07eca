use chrono::{DateTime, Utc};

use crate::models::{capitalize, FindingRow};
use crate::{Error, Result};

pub const CSV_HEADER: [&str; 8] = [
    "No",
    "Date Created",
    "Bug Name",
    "Bug Type",
    "Description",
    "Url",
    "Severity",
    "Status",
];

/// Render findings as a CSV report, numbered from 1 in the given order.
pub fn findings_csv(rows: &[FindingRow]) -> Result<String> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER).map_err(csv_error)?;

    for (i, row) in rows.iter().enumerate() {
        let number = (i + 1).to_string();
        let created = row.created_at.format("%d/%m/%y %H:%M").to_string();
        let severity = capitalize(&row.severity);
        let status = capitalize(&row.status);
        writer
            .write_record([
                number.as_str(),
                created.as_str(),
                row.name_bug.as_deref().unwrap_or_default(),
                row.type_bug.as_deref().unwrap_or_default(),
                row.description_bug.as_deref().unwrap_or_default(),
                row.url.as_str(),
                severity.as_str(),
                status.as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV writer flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::Internal(format!("CSV is not UTF-8: {e}")))
}

/// `bug_report_YYYYMMDD_HHMMSS.csv` for the given instant.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("bug_report_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

fn csv_error(err: ::csv::Error) -> Error {
    Error::Internal(format!("CSV write failed: {err}"))
}
