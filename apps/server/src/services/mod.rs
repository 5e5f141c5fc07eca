//! Listing services.
//!
//! Each service resolves the caller's domain, normalizes the raw request and
//! runs it against its store through the paging engine.

mod checklist;
mod findings;

pub use checklist::ChecklistService;
pub use findings::{FindingsListing, FindingsService};

use std::sync::Arc;

use crate::{auth::Principal, db::DomainResolver, Error, Result};

/// Domain the caller's listings are restricted to.
async fn caller_domain(
    resolver: &Arc<dyn DomainResolver>,
    principal: &Principal,
) -> Result<String> {
    resolver.resolve(&principal.subject).await?.ok_or_else(|| {
        tracing::info!(subject = %principal.subject, "no client domain for subject");
        Error::NotFound("no domain registered for this account".to_string())
    })
}
