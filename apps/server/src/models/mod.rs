//! Row types returned by the listing stores

pub mod checklist;
pub mod finding;

pub use checklist::{ChecklistRow, UrlBucket, UrlPage};
pub use finding::{capitalize, FindingRow};
