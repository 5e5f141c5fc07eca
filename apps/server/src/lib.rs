//! Findings dashboard API.
//!
//! Serves the relational findings table and the search-index security
//! checklist through one bidirectional cursor-paging engine, plus bounded
//! CSV export of findings.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod search_index;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
