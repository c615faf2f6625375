//! `PostgreSQL` implementation of the `TaleRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use storyloom_core::error::DomainError;
use storyloom_core::repository::TaleRepository;
use storyloom_core::tale::{Tale, TaleComponents, TaleStatus, TaleStyle};

use crate::infrastructure;

const SELECT_COLUMNS: &str = "id, user_id, user_name, title, body, status, components, style, \
                              language, created_at, updated_at";

/// Row shape of the `tales` table.
#[derive(Debug, sqlx::FromRow)]
struct TaleRow {
    id: Uuid,
    user_id: String,
    user_name: String,
    title: String,
    body: String,
    status: String,
    components: Json<TaleComponents>,
    style: Json<TaleStyle>,
    language: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaleRow> for Tale {
    type Error = DomainError;

    fn try_from(row: TaleRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<TaleStatus>()
            .map_err(DomainError::Infrastructure)?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            title: row.title,
            body: row.body,
            status,
            components: row.components.0,
            style: row.style.0,
            language: row.language,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed tale repository.
#[derive(Debug, Clone)]
pub struct PgTaleRepository {
    pool: PgPool,
}

impl PgTaleRepository {
    /// Creates a new `PgTaleRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn expect_one_row(rows_affected: u64, tale_id: Uuid) -> Result<(), DomainError> {
        if rows_affected == 0 {
            Err(DomainError::tale_not_found(tale_id))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaleRepository for PgTaleRepository {
    async fn insert(&self, tale: &Tale) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO tales (id, user_id, user_name, title, body, status, components, style, \
             language, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(tale.id)
        .bind(&tale.user_id)
        .bind(&tale.user_name)
        .bind(&tale.title)
        .bind(&tale.body)
        .bind(tale.status.as_str())
        .bind(Json(&tale.components))
        .bind(Json(&tale.style))
        .bind(&tale.language)
        .bind(tale.created_at)
        .bind(tale.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(())
    }

    async fn find_by_id(&self, tale_id: Uuid) -> Result<Option<Tale>, DomainError> {
        let row: Option<TaleRow> =
            sqlx::query_as(&format!("SELECT {SELECT_COLUMNS} FROM tales WHERE id = $1"))
                .bind(tale_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(infrastructure)?;
        row.map(Tale::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        limit: u32,
        start_after: Option<Uuid>,
    ) -> Result<Vec<Tale>, DomainError> {
        // An unknown cursor matches no row in the sub-select, so the
        // keyset predicate is skipped and the first page is returned.
        let rows: Vec<TaleRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM tales \
             WHERE user_id = $1 \
               AND ($2::uuid IS NULL \
                    OR NOT EXISTS (SELECT 1 FROM tales c WHERE c.id = $2) \
                    OR (created_at, id) < (SELECT c.created_at, c.id FROM tales c WHERE c.id = $2)) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3"
        ))
        .bind(user_id)
        .bind(start_after)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;

        rows.into_iter().map(Tale::try_from).collect()
    }

    async fn update_content(&self, tale: &Tale, expected: TaleStatus) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE tales SET title = $2, body = $3, components = $4, style = $5, updated_at = $6 \
             WHERE id = $1 AND status = $7",
        )
        .bind(tale.id)
        .bind(&tale.title)
        .bind(&tale.body)
        .bind(Json(&tale.components))
        .bind(Json(&tale.style))
        .bind(tale.updated_at)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Nothing matched: either the row is gone or its status moved on.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tales WHERE id = $1)")
            .bind(tale.id)
            .fetch_one(&self.pool)
            .await
            .map_err(infrastructure)?;
        if exists {
            Err(DomainError::tale_status_changed(tale.id))
        } else {
            Err(DomainError::tale_not_found(tale.id))
        }
    }

    async fn compare_and_set_status(
        &self,
        tale_id: Uuid,
        expected: TaleStatus,
        next: TaleStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE tales SET status = $3, updated_at = $4 WHERE id = $1 AND status = $2",
        )
        .bind(tale_id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(result.rows_affected() == 1)
    }

    async fn record_generation_success(
        &self,
        tale_id: Uuid,
        body: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result =
            sqlx::query("UPDATE tales SET status = $2, body = $3, updated_at = $4 WHERE id = $1")
                .bind(tale_id)
                .bind(TaleStatus::Completed.as_str())
                .bind(body)
                .bind(at)
                .execute(&self.pool)
                .await
                .map_err(infrastructure)?;
        Self::expect_one_row(result.rows_affected(), tale_id)
    }

    async fn record_generation_failure(
        &self,
        tale_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE tales SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(tale_id)
            .bind(TaleStatus::Failed.as_str())
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Self::expect_one_row(result.rows_affected(), tale_id)
    }

    async fn delete(&self, tale_id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM tales WHERE id = $1")
            .bind(tale_id)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(())
    }
}
