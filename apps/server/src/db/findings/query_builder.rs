//! SQL builder for the findings table.
//!
//! Every caller-supplied value goes through a bind parameter. The only text
//! spliced into the statement is the allowlisted sort column and the sort
//! direction keyword.

use findings_paging::{FetchPlan, FilterParams, SortOrder};

use super::bind::{push_bigint, push_int, push_text, push_text_array};
use super::BindValue;

const SELECT_COLUMNS: &str = "\
list_bugs.id, list_bugs.host, list_bugs.method, list_bugs.status_code, list_bugs.tool, \
list_bugs.url, list_bugs.pentester_ip, list_bugs.severity, list_bugs.status, \
list_bugs.vulnerability, list_bugs.validation, list_bugs.flag_domain, \
list_bugs.created_at, list_bugs.updated_at, \
list_vulnerabilities.name_bug AS name_bug, \
list_vulnerabilities.type_bug AS type_bug, \
list_vulnerabilities.description_bug AS description_bug";

const FROM_CLAUSE: &str = "FROM list_bugs \
LEFT JOIN list_vulnerabilities ON list_bugs.id_list_vulnerability = list_vulnerabilities.unique_id";

fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "id" => "list_bugs.id",
        _ => "list_bugs.created_at",
    }
}

/// Escape SQL LIKE meta-characters so user input is matched literally.
fn escape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone)]
pub struct FindingsQuery<'a> {
    filter: &'a FilterParams,
    order: SortOrder,
    tie_order: SortOrder,
    cursor: Option<i64>,
    limit: Option<usize>,
}

impl<'a> FindingsQuery<'a> {
    /// One page, seeking after the plan's cursor.
    pub fn page(plan: &FetchPlan<'a>) -> Self {
        Self {
            filter: plan.filter,
            order: plan.order,
            tie_order: plan.tie_order,
            cursor: plan.cursor.and_then(|c| c.as_ordinal()),
            limit: Some(plan.fetch_limit),
        }
    }

    /// Every matching row in display order, capped at `max_rows`.
    pub fn export(filter: &'a FilterParams, max_rows: usize) -> Self {
        Self {
            filter,
            order: filter.sort_order,
            tie_order: filter.sort_order,
            cursor: None,
            limit: Some(max_rows),
        }
    }

    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let mut sql = format!("SELECT {SELECT_COLUMNS} {FROM_CLAUSE}");

        let clauses = self.where_clauses(&mut bind_params);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        self.push_order_by(&mut sql);

        if let Some(limit) = self.limit {
            let idx = push_bigint(
                &mut bind_params,
                i64::try_from(limit).unwrap_or(i64::MAX),
            );
            sql.push_str(&format!(" LIMIT ${idx}"));
        }

        (sql, bind_params)
    }

    fn where_clauses(&self, bind_params: &mut Vec<BindValue>) -> Vec<String> {
        let filter = self.filter;
        let mut clauses = Vec::new();

        if let Some(term) = filter.search.as_deref() {
            let pattern = format!("%{}%", escape_like_pattern(&term.to_lowercase()));
            let p = push_text(bind_params, pattern);
            let exact = push_text(bind_params, term.to_string());
            clauses.push(format!(
                "(UPPER(list_bugs.status) LIKE UPPER(${p}) \
                 OR LOWER(list_bugs.host) LIKE ${p} \
                 OR UPPER(list_bugs.severity) LIKE UPPER(${p}) \
                 OR LOWER(list_bugs.url) LIKE ${p} \
                 OR list_bugs.vulnerability = ${exact} \
                 OR LOWER(list_vulnerabilities.name_bug) LIKE ${p} \
                 OR LOWER(list_vulnerabilities.type_bug) LIKE ${p})"
            ));
        }

        let equals = [
            ("list_bugs.flag_domain", &filter.domain),
            ("list_bugs.severity", &filter.severity),
            ("list_bugs.status", &filter.status),
            ("list_bugs.validation", &filter.validation),
        ];
        for (column, value) in equals {
            if let Some(value) = value {
                let idx = push_text(bind_params, value.clone());
                clauses.push(format!("{column} = ${idx}"));
            }
        }

        if !filter.urls.is_empty() {
            let idx = push_text_array(bind_params, filter.urls.clone());
            clauses.push(format!("list_bugs.url = ANY(${idx})"));
        }

        if let Some(days) = filter.period_days {
            let idx = push_int(bind_params, i32::try_from(days).unwrap_or(i32::MAX));
            clauses.push(format!(
                "list_bugs.created_at >= NOW() - make_interval(days => ${idx})"
            ));
        }

        if let Some(cursor) = self.cursor {
            let idx = push_bigint(bind_params, cursor);
            let op = if self.tie_order.is_ascending() { ">" } else { "<" };
            clauses.push(format!("list_bugs.id {op} ${idx}"));
        }

        clauses
    }

    fn push_order_by(&self, sql: &mut String) {
        let column = sort_column(self.filter.sort_by);
        let dir = self.order.as_sql();
        if column == "list_bugs.id" {
            sql.push_str(&format!(" ORDER BY list_bugs.id {dir}"));
            return;
        }
        // Identity breaks ties so equal sort values still page deterministically.
        let tie = self.tie_order.as_sql();
        sql.push_str(&format!(" ORDER BY {column} {dir}, list_bugs.id {tie}"));
    }
}
