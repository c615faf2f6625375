//! PostgreSQL-backed repositories for the Storyloom tale service.

pub mod pg_catalog_repository;
pub mod pg_profile_repository;
pub mod pg_tale_repository;

pub use pg_catalog_repository::PgCatalogRepository;
pub use pg_profile_repository::PgProfileRepository;
pub use pg_tale_repository::PgTaleRepository;

use storyloom_core::error::DomainError;

/// Maps a driver error into the domain's infrastructure error.
pub(crate) fn infrastructure(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "database operation failed");
    DomainError::Infrastructure(err.to_string())
}

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
