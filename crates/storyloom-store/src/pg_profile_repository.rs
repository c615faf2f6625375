//! `PostgreSQL` implementation of the `ProfileRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use storyloom_core::error::DomainError;
use storyloom_core::profile::UserProfile;
use storyloom_core::repository::ProfileRepository;

use crate::infrastructure;

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    user_id: String,
    user_name: String,
    language: String,
    timezone: String,
    allow_notifications: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            user_name: row.user_name,
            language: row.language,
            timezone: row.timezone,
            allow_notifications: row.allow_notifications,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed profile repository.
#[derive(Debug, Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Creates a new `PgProfileRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT user_id, user_name, language, timezone, allow_notifications, \
             created_at, updated_at \
             FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(row.map(UserProfile::from))
    }

    async fn insert_if_absent(&self, profile: &UserProfile) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "INSERT INTO user_profiles (user_id, user_name, language, timezone, \
             allow_notifications, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(&profile.user_id)
        .bind(&profile.user_name)
        .bind(&profile.language)
        .bind(&profile.timezone)
        .bind(profile.allow_notifications)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE user_profiles \
             SET language = $2, timezone = $3, allow_notifications = $4, updated_at = $5 \
             WHERE user_id = $1",
        )
        .bind(&profile.user_id)
        .bind(&profile.language)
        .bind(&profile.timezone)
        .bind(profile.allow_notifications)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::profile_not_found(&profile.user_id));
        }
        Ok(())
    }
}
