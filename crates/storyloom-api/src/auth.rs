//! Caller identity.
//!
//! Tokens are verified by the identity-aware proxy in front of the service,
//! which forwards the verified subject in [`USER_ID_HEADER`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use storyloom_core::error::DomainError;

use crate::error::ApiError;

/// Header carrying the verified user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Identity-provider user id.
    pub user_id: String,
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ApiError(DomainError::Unauthenticated))?;

        Ok(Self {
            user_id: user_id.to_owned(),
        })
    }
}
