//! Query handlers for the User Profile context.

use storyloom_core::error::DomainError;
use storyloom_core::profile::UserProfile;
use storyloom_core::repository::ProfileRepository;

/// Retrieves the caller's profile.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no profile exists for the user.
pub async fn get_profile(
    user_id: &str,
    repo: &dyn ProfileRepository,
) -> Result<UserProfile, DomainError> {
    repo.find(user_id)
        .await?
        .ok_or_else(|| DomainError::profile_not_found(user_id))
}
