//! Command handlers for the Tales context.
//!
//! Each handler validates its input, enforces ownership, and performs a
//! single write. Validation failures never leave a partial mutation.

use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::repository::{ProfileRepository, TaleRepository};
use storyloom_core::tale::{Tale, TaleStatus};
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::{CreateTale, DeleteTale, UpdateTale};
use crate::domain::rules::{ensure_owner, merge_components, normalize_style, normalize_title};

/// Loads a tale and checks that `caller_id` owns it.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the tale does not exist and
/// `DomainError::PermissionDenied` if the caller is not the owner.
pub(crate) async fn load_owned_tale(
    repo: &dyn TaleRepository,
    tale_id: Uuid,
    caller_id: &str,
) -> Result<Tale, DomainError> {
    let tale = repo
        .find_by_id(tale_id)
        .await?
        .ok_or_else(|| DomainError::tale_not_found(tale_id))?;
    ensure_owner(&tale, caller_id)?;
    Ok(tale)
}

/// Handles the `CreateTale` command: validates input, copies the author's
/// name and language from their profile, and stores a `Draft` tale with an
/// empty body.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank title, missing hero or
/// blank style, `DomainError::NotFound` if the caller has no profile, and
/// `DomainError::Infrastructure` if the store fails.
pub async fn handle_create_tale(
    command: &CreateTale,
    clock: &dyn Clock,
    tales: &dyn TaleRepository,
    profiles: &dyn ProfileRepository,
) -> Result<Tale, DomainError> {
    let title = normalize_title(&command.title)?;
    if command.components.hero.is_none() {
        return Err(DomainError::Validation("hero is required".into()));
    }
    let style = normalize_style(&command.style)?;

    let profile = profiles
        .find(&command.user_id)
        .await?
        .ok_or_else(|| DomainError::profile_not_found(&command.user_id))?;

    let now = clock.now();
    let tale = Tale {
        id: Uuid::now_v7(),
        user_id: command.user_id.clone(),
        user_name: profile.user_name,
        title,
        body: String::new(),
        status: TaleStatus::Draft,
        components: command.components.clone(),
        style,
        language: profile.language,
        created_at: now,
        updated_at: now,
    };

    tales.insert(&tale).await?;
    info!(
        correlation_id = %command.correlation_id,
        tale_id = %tale.id,
        "tale created"
    );

    Ok(tale)
}

/// Handles the `UpdateTale` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` / `DomainError::PermissionDenied` for a
/// missing or foreign tale, `DomainError::FailedPrecondition` while the tale
/// is generating or its status changes before the write lands,
/// `DomainError::Validation` for a blank title or style or
/// for clearing the body of a completed tale, and
/// `DomainError::Infrastructure` if the store fails.
pub async fn handle_update_tale(
    command: &UpdateTale,
    clock: &dyn Clock,
    tales: &dyn TaleRepository,
) -> Result<Tale, DomainError> {
    let mut tale = load_owned_tale(tales, command.tale_id, &command.caller_id).await?;
    let observed = tale.status;

    if observed == TaleStatus::Generating {
        return Err(DomainError::FailedPrecondition(
            "tale cannot be edited while it is generating".into(),
        ));
    }

    if let Some(title) = &command.title {
        tale.title = normalize_title(title)?;
    }
    if let Some(style) = &command.style {
        tale.style = normalize_style(style)?;
    }
    if let Some(body) = &command.body {
        if tale.status == TaleStatus::Completed && body.trim().is_empty() {
            return Err(DomainError::Validation(
                "body of a completed tale cannot be empty".into(),
            ));
        }
        tale.body.clone_from(body);
    }
    if let Some(patch) = &command.components {
        tale.components = merge_components(&tale.components, patch.clone());
    }
    tale.updated_at = clock.now();

    // A generation that starts after the read above makes this write fail.
    tales.update_content(&tale, observed).await?;
    info!(
        correlation_id = %command.correlation_id,
        tale_id = %tale.id,
        "tale updated"
    );

    Ok(tale)
}

/// Handles the `DeleteTale` command. Tales may be deleted in any status.
///
/// # Errors
///
/// Returns `DomainError::NotFound` / `DomainError::PermissionDenied` for a
/// missing or foreign tale and `DomainError::Infrastructure` if the store
/// fails.
pub async fn handle_delete_tale(
    command: &DeleteTale,
    tales: &dyn TaleRepository,
) -> Result<(), DomainError> {
    let tale = load_owned_tale(tales, command.tale_id, &command.caller_id).await?;

    tales.delete(tale.id).await?;
    info!(
        correlation_id = %command.correlation_id,
        tale_id = %tale.id,
        status = %tale.status,
        "tale deleted"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use storyloom_core::error::DomainError;
    use storyloom_core::tale::{Character, TaleComponents, TaleStatus, TaleStyle};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_create_tale, handle_delete_tale, handle_update_tale,
    };
    use crate::domain::commands::{ComponentsPatch, CreateTale, DeleteTale, UpdateTale};
    use storyloom_test_support::{
        FailingTaleRepository, FixedClock, InMemoryProfileRepository, InMemoryTaleRepository,
        sample_profile, sample_tale,
    };

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
    }

    fn create_command(title: &str, hero: Option<&str>, style: &str) -> CreateTale {
        CreateTale {
            correlation_id: Uuid::new_v4(),
            user_id: "user-1".to_owned(),
            title: title.to_owned(),
            components: TaleComponents {
                hero: hero.map(|name| Character::named(name)),
                ..TaleComponents::default()
            },
            style: TaleStyle {
                style: style.to_owned(),
                description: String::new(),
            },
        }
    }

    fn update_command(tale_id: Uuid, caller_id: &str) -> UpdateTale {
        UpdateTale {
            correlation_id: Uuid::new_v4(),
            tale_id,
            caller_id: caller_id.to_owned(),
            title: None,
            body: None,
            style: None,
            components: None,
        }
    }

    #[tokio::test]
    async fn test_create_tale_stores_draft_with_empty_body() {
        // Arrange
        let tales = InMemoryTaleRepository::new();
        let mut profile = sample_profile("user-1");
        profile.language = "fr".to_owned();
        let profiles = InMemoryProfileRepository::with_profiles([profile]);
        let command = create_command("  The Quest  ", Some("Arthur"), " adventure ");

        // Act
        let tale = handle_create_tale(&command, &clock(), &tales, &profiles)
            .await
            .unwrap();

        // Assert
        assert_eq!(tale.status, TaleStatus::Draft);
        assert!(tale.body.is_empty());
        assert_eq!(tale.title, "The Quest");
        assert_eq!(tale.style.style, "adventure");
        assert_eq!(tale.language, "fr");
        assert_eq!(tale.user_id, "user-1");
        assert_eq!(tale.created_at, clock().0);
        assert_eq!(tales.get(tale.id), Some(tale));
    }

    #[tokio::test]
    async fn test_create_tale_rejects_invalid_input_without_writing() {
        let tales = InMemoryTaleRepository::new();
        let profiles = InMemoryProfileRepository::with_profiles([sample_profile("user-1")]);

        for command in [
            create_command("  ", Some("Arthur"), "adventure"),
            create_command("The Quest", None, "adventure"),
            create_command("The Quest", Some("Arthur"), " "),
        ] {
            let result = handle_create_tale(&command, &clock(), &tales, &profiles).await;
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
        assert!(tales.is_empty());
    }

    #[tokio::test]
    async fn test_create_tale_without_profile_is_not_found() {
        let tales = InMemoryTaleRepository::new();
        let profiles = InMemoryProfileRepository::new();
        let command = create_command("The Quest", Some("Arthur"), "adventure");

        let result = handle_create_tale(&command, &clock(), &tales, &profiles).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert!(tales.is_empty());
    }

    #[tokio::test]
    async fn test_update_tale_applies_given_fields() {
        // Arrange
        let tale = sample_tale("user-1");
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);
        let mut command = update_command(tale.id, "user-1");
        command.title = Some(" New Title ".to_owned());
        command.body = Some("Once upon a time".to_owned());
        command.components = Some(ComponentsPatch {
            villains: Some(vec![Character::named("Dragon")]),
            ..ComponentsPatch::default()
        });

        // Act
        let updated = handle_update_tale(&command, &clock(), &tales).await.unwrap();

        // Assert
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.body, "Once upon a time");
        assert_eq!(updated.components.hero, tale.components.hero);
        assert_eq!(updated.components.villains[0].name, "Dragon");
        assert_eq!(updated.status, TaleStatus::Draft);
        assert_eq!(tales.get(tale.id).unwrap().updated_at, clock().0);
    }

    #[tokio::test]
    async fn test_update_tale_rejects_blank_style() {
        let tale = sample_tale("user-1");
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);
        let mut command = update_command(tale.id, "user-1");
        command.style = Some(TaleStyle::default());

        let result = handle_update_tale(&command, &clock(), &tales).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(tales.get(tale.id), Some(tale));
    }

    #[tokio::test]
    async fn test_update_tale_rejected_while_generating() {
        let mut tale = sample_tale("user-1");
        tale.status = TaleStatus::Generating;
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);
        let mut command = update_command(tale.id, "user-1");
        command.title = Some("Other".to_owned());

        let result = handle_update_tale(&command, &clock(), &tales).await;

        assert!(matches!(result, Err(DomainError::FailedPrecondition(_))));
    }

    #[tokio::test]
    async fn test_update_tale_loses_to_generation_finishing_after_read() {
        // Arrange: the edit reads a draft, then a generation completes
        // before the edit is written.
        let tale = sample_tale("user-1");
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);
        tales.after_next_read(|stored| {
            stored.status = TaleStatus::Completed;
            stored.body = "The knight rode forth.".to_owned();
        });
        let mut command = update_command(tale.id, "user-1");
        command.body = Some(String::new());

        // Act
        let result = handle_update_tale(&command, &clock(), &tales).await;

        // Assert
        assert!(matches!(result, Err(DomainError::FailedPrecondition(_))));
        let stored = tales.get(tale.id).unwrap();
        assert_eq!(stored.status, TaleStatus::Completed);
        assert_eq!(stored.body, "The knight rode forth.");
    }

    #[tokio::test]
    async fn test_update_tale_loses_to_generation_starting_after_read() {
        let tale = sample_tale("user-1");
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);
        tales.after_next_read(|stored| stored.status = TaleStatus::Generating);
        let mut command = update_command(tale.id, "user-1");
        command.title = Some("Renamed".to_owned());

        let result = handle_update_tale(&command, &clock(), &tales).await;

        assert!(matches!(result, Err(DomainError::FailedPrecondition(_))));
        assert_eq!(tales.get(tale.id).unwrap().title, tale.title);
    }

    #[tokio::test]
    async fn test_update_tale_cannot_clear_completed_body() {
        let mut tale = sample_tale("user-1");
        tale.status = TaleStatus::Completed;
        tale.body = "The end.".to_owned();
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);
        let mut command = update_command(tale.id, "user-1");
        command.body = Some(String::new());

        let result = handle_update_tale(&command, &clock(), &tales).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(tales.get(tale.id).unwrap().body, "The end.");
    }

    #[tokio::test]
    async fn test_update_tale_by_other_user_is_denied() {
        let tale = sample_tale("user-1");
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);

        let result = handle_update_tale(&update_command(tale.id, "user-2"), &clock(), &tales).await;

        assert!(matches!(result, Err(DomainError::PermissionDenied { .. })));
    }

    #[tokio::test]
    async fn test_delete_tale_removes_it_in_any_status() {
        let mut tale = sample_tale("user-1");
        tale.status = TaleStatus::Generating;
        let tales = InMemoryTaleRepository::with_tales([tale.clone()]);
        let command = DeleteTale {
            correlation_id: Uuid::new_v4(),
            tale_id: tale.id,
            caller_id: "user-1".to_owned(),
        };

        handle_delete_tale(&command, &tales).await.unwrap();

        assert!(tales.get(tale.id).is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_tale_is_not_found() {
        let tales = InMemoryTaleRepository::new();
        let tale_id = Uuid::new_v4();
        let command = DeleteTale {
            correlation_id: Uuid::new_v4(),
            tale_id,
            caller_id: "user-1".to_owned(),
        };

        let result = handle_delete_tale(&command, &tales).await;

        match result.unwrap_err() {
            DomainError::NotFound { id, .. } => assert_eq!(id, tale_id.to_string()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_surfaces_store_failure() {
        let command = DeleteTale {
            correlation_id: Uuid::new_v4(),
            tale_id: Uuid::new_v4(),
            caller_id: "user-1".to_owned(),
        };

        let result = handle_delete_tale(&command, &FailingTaleRepository).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }
}
