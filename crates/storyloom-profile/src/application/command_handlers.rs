//! Command handlers for the User Profile context.

use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::profile::{DEFAULT_LANGUAGE, DEFAULT_TIMEZONE, UserProfile};
use storyloom_core::repository::ProfileRepository;
use tracing::info;

use crate::domain::commands::{CreateProfile, UpdatePreferences};

const ANONYMOUS: &str = "Anonymous";

/// Derives the display name: the provider's display name, else the local
/// part of the e-mail address, else "Anonymous".
fn derive_user_name(display_name: Option<&str>, email: Option<&str>) -> String {
    display_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .or_else(|| {
            email
                .and_then(|e| e.split('@').next())
                .map(str::trim)
                .filter(|local| !local.is_empty())
        })
        .unwrap_or(ANONYMOUS)
        .to_owned()
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Handles the `CreateProfile` command. Creating a profile that already
/// exists returns the stored profile unchanged.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the user id is blank, or
/// `DomainError::Infrastructure` if the store fails.
pub async fn handle_create_profile(
    command: &CreateProfile,
    clock: &dyn Clock,
    repo: &dyn ProfileRepository,
) -> Result<UserProfile, DomainError> {
    if command.user_id.trim().is_empty() {
        return Err(DomainError::Validation("user id is required".into()));
    }

    let now = clock.now();
    let profile = UserProfile {
        user_id: command.user_id.clone(),
        user_name: derive_user_name(command.display_name.as_deref(), command.email.as_deref()),
        language: DEFAULT_LANGUAGE.to_owned(),
        timezone: DEFAULT_TIMEZONE.to_owned(),
        allow_notifications: true,
        created_at: now,
        updated_at: now,
    };

    if repo.insert_if_absent(&profile).await? {
        info!(user_id = %profile.user_id, "user profile created");
        return Ok(profile);
    }

    repo.find(&command.user_id)
        .await?
        .ok_or_else(|| DomainError::profile_not_found(&command.user_id))
}

/// Handles the `UpdatePreferences` command. Blank strings are ignored.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the caller has no profile, or
/// `DomainError::Infrastructure` if the store fails.
pub async fn handle_update_preferences(
    command: &UpdatePreferences,
    clock: &dyn Clock,
    repo: &dyn ProfileRepository,
) -> Result<UserProfile, DomainError> {
    let mut profile = repo
        .find(&command.user_id)
        .await?
        .ok_or_else(|| DomainError::profile_not_found(&command.user_id))?;

    if let Some(language) = non_blank(command.language.as_ref()) {
        profile.language = language;
    }
    if let Some(timezone) = non_blank(command.timezone.as_ref()) {
        profile.timezone = timezone;
    }
    if let Some(allow) = command.allow_notifications {
        profile.allow_notifications = allow;
    }
    profile.updated_at = clock.now();

    repo.update(&profile).await?;
    info!(user_id = %profile.user_id, "preferences updated");

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storyloom_test_support::{FixedClock, InMemoryProfileRepository, sample_profile};
    use uuid::Uuid;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap())
    }

    fn create(user_id: &str, display_name: Option<&str>, email: Option<&str>) -> CreateProfile {
        CreateProfile {
            correlation_id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            display_name: display_name.map(str::to_owned),
            email: email.map(str::to_owned),
        }
    }

    #[test]
    fn test_derive_user_name_precedence() {
        assert_eq!(derive_user_name(Some("Ada"), Some("ada@example.com")), "Ada");
        assert_eq!(derive_user_name(Some("  "), Some("ada@example.com")), "ada");
        assert_eq!(derive_user_name(None, None), "Anonymous");
        assert_eq!(derive_user_name(None, Some("@example.com")), "Anonymous");
    }

    #[tokio::test]
    async fn test_create_profile_applies_defaults() {
        // Arrange
        let repo = InMemoryProfileRepository::new();
        let command = create("user-1", None, Some("merlin@example.com"));

        // Act
        let profile = handle_create_profile(&command, &clock(), &repo).await.unwrap();

        // Assert
        assert_eq!(profile.user_name, "merlin");
        assert_eq!(profile.language, "en");
        assert_eq!(profile.timezone, "UTC");
        assert!(profile.allow_notifications);
        assert_eq!(repo.get("user-1"), Some(profile));
    }

    #[tokio::test]
    async fn test_create_profile_keeps_existing_profile() {
        let mut existing = sample_profile("user-1");
        existing.language = "de".to_owned();
        let repo = InMemoryProfileRepository::with_profiles([existing.clone()]);

        let profile = handle_create_profile(&create("user-1", Some("New"), None), &clock(), &repo)
            .await
            .unwrap();

        assert_eq!(profile, existing);
    }

    #[tokio::test]
    async fn test_update_preferences_ignores_blank_and_absent_fields() {
        // Arrange
        let repo = InMemoryProfileRepository::with_profiles([sample_profile("user-1")]);
        let command = UpdatePreferences {
            correlation_id: Uuid::new_v4(),
            user_id: "user-1".to_owned(),
            language: Some("fr".to_owned()),
            timezone: Some("   ".to_owned()),
            allow_notifications: Some(false),
        };

        // Act
        let profile = handle_update_preferences(&command, &clock(), &repo).await.unwrap();

        // Assert
        assert_eq!(profile.language, "fr");
        assert_eq!(profile.timezone, "UTC");
        assert!(!profile.allow_notifications);
        assert_eq!(profile.updated_at, clock().0);
        assert_eq!(repo.get("user-1").unwrap().language, "fr");
    }

    #[tokio::test]
    async fn test_update_preferences_without_profile_is_not_found() {
        let repo = InMemoryProfileRepository::new();
        let command = UpdatePreferences {
            correlation_id: Uuid::new_v4(),
            user_id: "ghost".to_owned(),
            language: None,
            timezone: None,
            allow_notifications: None,
        };

        let result = handle_update_preferences(&command, &clock(), &repo).await;

        match result.unwrap_err() {
            DomainError::NotFound { id, .. } => assert_eq!(id, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
