//! Request handlers for the listing endpoints

pub mod checklist;
pub mod findings;

pub use checklist::{checklist_detail, checklist_table, list_urls};
pub use findings::list_findings;
