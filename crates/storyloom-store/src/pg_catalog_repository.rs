//! `PostgreSQL` implementation of the `CatalogRepository` trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;

use storyloom_core::catalog::{CatalogEntry, Localization};
use storyloom_core::error::DomainError;
use storyloom_core::repository::CatalogRepository;

use crate::infrastructure;

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: String,
    category: String,
    sort_order: i32,
    image_url: String,
    is_active: bool,
    translations: Json<BTreeMap<String, Localization>>,
}

impl From<CatalogRow> for CatalogEntry {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            sort_order: row.sort_order,
            image_url: row.image_url,
            is_active: row.is_active,
            translations: row.translations.0,
        }
    }
}

/// PostgreSQL-backed catalog repository.
#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Creates a new `PgCatalogRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_active(&self) -> Result<Vec<CatalogEntry>, DomainError> {
        let rows: Vec<CatalogRow> = sqlx::query_as(
            "SELECT id, category, sort_order, image_url, is_active, translations \
             FROM catalog_entries \
             WHERE is_active \
             ORDER BY sort_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(rows.into_iter().map(CatalogEntry::from).collect())
    }
}
