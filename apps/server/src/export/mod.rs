//! Bulk export of findings listings.

mod csv;

pub use self::csv::{export_filename, findings_csv, CSV_HEADER};
