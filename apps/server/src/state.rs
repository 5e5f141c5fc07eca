//! Shared application state handed to every handler.

use std::sync::Arc;

use anyhow::Context;

use crate::{
    auth::TokenVerifier,
    config::Config,
    db::{self, DomainResolver, FindingStore, PostgresDomainResolver, PostgresFindingStore},
    search_index::{ChecklistStore, ElasticChecklistStore, SearchIndexClient},
    services::{ChecklistService, FindingsService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<TokenVerifier>,
    pub findings: Arc<FindingsService>,
    pub checklist: Arc<ChecklistService>,
}

/// Store implementations backing the services.
pub struct Stores {
    pub findings: Arc<dyn FindingStore>,
    pub checklist: Arc<dyn ChecklistStore>,
    pub domains: Arc<dyn DomainResolver>,
}

impl AppState {
    /// Connect to Postgres and the search index and assemble the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database)
            .await
            .context("Failed to connect to database")?;
        tracing::info!(
            max_connections = config.database.pool_max_size,
            "Database pool ready"
        );

        let search = SearchIndexClient::new(&config.search_index)
            .context("Failed to build search index client")?;
        tracing::info!(url = search.search_url(), "Search index client ready");

        let stores = Stores {
            findings: Arc::new(PostgresFindingStore::new(pool.clone())),
            checklist: Arc::new(ElasticChecklistStore::new(search)),
            domains: Arc::new(PostgresDomainResolver::new(pool)),
        };
        Self::from_parts(config, stores)
    }

    /// Assemble state around already-built stores.
    pub fn from_parts(config: Config, stores: Stores) -> anyhow::Result<Self> {
        let auth = TokenVerifier::new(&config.auth)
            .map_err(|e| anyhow::anyhow!("Failed to initialize token verification: {e:?}"))?;

        let findings =
            FindingsService::new(stores.findings, stores.domains.clone(), &config.paging);
        let checklist = ChecklistService::new(stores.checklist, stores.domains, &config.paging);

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            findings: Arc::new(findings),
            checklist: Arc::new(checklist),
        })
    }
}
