use chrono::{DateTime, Utc};
use findings_paging::{Cursor, PageRow};
use serde::{Serialize, Serializer};

/// A finding joined with its vulnerability catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct FindingRow {
    pub id: i64,
    pub host: String,
    pub method: String,
    pub status_code: i64,
    pub tool: String,
    pub url: String,
    pub pentester_ip: String,
    #[serde(serialize_with = "capitalized")]
    pub severity: String,
    #[serde(serialize_with = "capitalized")]
    pub status: String,
    #[serde(serialize_with = "capitalized")]
    pub vulnerability: String,
    #[serde(serialize_with = "capitalized")]
    pub validation: String,
    pub flag_domain: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name_bug: Option<String>,
    pub type_bug: Option<String>,
    pub description_bug: Option<String>,
}

impl PageRow for FindingRow {
    fn identity(&self) -> String {
        self.id.to_string()
    }

    fn cursor(&self) -> Cursor {
        Cursor::Ordinal(self.id)
    }
}

/// First character uppercased, the rest lowercased.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

fn capitalized<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&capitalize(value))
}
