//! Domain error types.

use thiserror::Error;

/// Errors surfaced synchronously to the caller of a tale, catalog or
/// profile operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No verified caller identity accompanied the request.
    #[error("caller must be authenticated")]
    Unauthenticated,

    /// Bad or missing input.
    #[error("invalid argument: {0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// The caller does not own the referenced entity.
    #[error("caller is not permitted to access {entity} {id}")]
    PermissionDenied {
        /// Kind of entity that was accessed.
        entity: &'static str,
        /// Identifier of the entity.
        id: String,
    },

    /// The entity is not in a state that allows the requested transition.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// A collaborator (store, network) failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a `NotFound` error on a tale.
    #[must_use]
    pub fn tale_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "tale",
            id: id.to_string(),
        }
    }

    /// Shorthand for a `FailedPrecondition` raised when a tale's status
    /// changed between reading and writing it.
    #[must_use]
    pub fn tale_status_changed(id: impl ToString) -> Self {
        Self::FailedPrecondition(format!("tale {} changed status concurrently", id.to_string()))
    }

    /// Shorthand for a `NotFound` error on a user profile.
    #[must_use]
    pub fn profile_not_found(user_id: impl ToString) -> Self {
        Self::NotFound {
            entity: "user profile",
            id: user_id.to_string(),
        }
    }
}
