use async_trait::async_trait;
use sqlx::PgPool;

use crate::{db::traits::DomainResolver, Result};

/// Resolves a user's most recently registered client domain.
#[derive(Clone)]
pub struct PostgresDomainResolver {
    pool: PgPool,
}

impl PostgresDomainResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DomainResolver for PostgresDomainResolver {
    async fn resolve(&self, subject: &str) -> Result<Option<String>> {
        let domain = sqlx::query_scalar::<_, String>(
            "SELECT domain_clients.domain \
             FROM clients \
             JOIN domain_clients ON domain_clients.id_client = clients.id \
             WHERE clients.id_user = $1 \
             ORDER BY domain_clients.created_at DESC \
             LIMIT 1",
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;

        Ok(domain)
    }
}
