//! Repository abstractions over the document store.
//!
//! Every method is a single independent write or read; no operation spans
//! more than one record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::CatalogEntry;
use crate::error::DomainError;
use crate::profile::UserProfile;
use crate::tale::{Tale, TaleStatus};

/// Persistence for tales.
#[async_trait]
pub trait TaleRepository: Send + Sync {
    /// Stores a new tale.
    async fn insert(&self, tale: &Tale) -> Result<(), DomainError>;

    /// Loads a tale by id.
    async fn find_by_id(&self, tale_id: Uuid) -> Result<Option<Tale>, DomainError>;

    /// Loads up to `limit` tales owned by `user_id`, newest first. When
    /// `start_after` names an existing tale, only tales ordered after it are
    /// returned; an unknown cursor is ignored.
    async fn list_for_user(
        &self,
        user_id: &str,
        limit: u32,
        start_after: Option<Uuid>,
    ) -> Result<Vec<Tale>, DomainError>;

    /// Overwrites title, body, components, style and `updated_at`, but only
    /// while the stored status still equals `expected`. Status is never
    /// written through this method.
    ///
    /// Returns `DomainError::NotFound` if the tale no longer exists and
    /// `DomainError::FailedPrecondition` if its status has moved on.
    async fn update_content(&self, tale: &Tale, expected: TaleStatus) -> Result<(), DomainError>;

    /// Sets the status to `next` only if it currently equals `expected`.
    /// Returns whether the swap happened.
    async fn compare_and_set_status(
        &self,
        tale_id: Uuid,
        expected: TaleStatus,
        next: TaleStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Stores generated text and marks the tale `Completed`.
    ///
    /// Returns `DomainError::NotFound` if the tale no longer exists.
    async fn record_generation_success(
        &self,
        tale_id: Uuid,
        body: &str,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Marks the tale `Failed`, leaving the body untouched.
    ///
    /// Returns `DomainError::NotFound` if the tale no longer exists.
    async fn record_generation_failure(
        &self,
        tale_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Removes a tale. Removing an absent tale is not an error.
    async fn delete(&self, tale_id: Uuid) -> Result<(), DomainError>;
}

/// Read-only access to the component catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Loads every active entry ordered by sort order.
    async fn list_active(&self) -> Result<Vec<CatalogEntry>, DomainError>;
}

/// Persistence for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Loads a profile by user id.
    async fn find(&self, user_id: &str) -> Result<Option<UserProfile>, DomainError>;

    /// Stores `profile` unless one already exists for the user. Returns
    /// whether it was stored.
    async fn insert_if_absent(&self, profile: &UserProfile) -> Result<bool, DomainError>;

    /// Overwrites the preference fields and `updated_at`.
    ///
    /// Returns `DomainError::NotFound` if the profile does not exist.
    async fn update(&self, profile: &UserProfile) -> Result<(), DomainError>;
}
