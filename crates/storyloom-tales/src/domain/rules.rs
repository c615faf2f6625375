//! Validation and transition rules for tales.

use storyloom_core::error::DomainError;
use storyloom_core::tale::{Tale, TaleComponents, TaleStyle};

use super::commands::ComponentsPatch;

/// Trims a title, rejecting blank ones.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the title is blank.
pub fn normalize_title(title: &str) -> Result<String, DomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("title is required".into()));
    }
    Ok(trimmed.to_owned())
}

/// Trims a style name, rejecting blank ones.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the style name is blank.
pub fn normalize_style(style: &TaleStyle) -> Result<TaleStyle, DomainError> {
    if !style.is_specified() {
        return Err(DomainError::Validation("tale style is required".into()));
    }
    Ok(TaleStyle {
        style: style.style.trim().to_owned(),
        description: style.description.clone(),
    })
}

/// Rejects callers other than the owner.
///
/// # Errors
///
/// Returns `DomainError::PermissionDenied` if `caller_id` does not own the tale.
pub fn ensure_owner(tale: &Tale, caller_id: &str) -> Result<(), DomainError> {
    if tale.is_owned_by(caller_id) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied {
            entity: "tale",
            id: tale.id.to_string(),
        })
    }
}

/// Checks that a tale can be handed to the generator.
///
/// # Errors
///
/// Returns `DomainError::FailedPrecondition` if the hero is missing or
/// unnamed, the style is missing, or a generation is already running.
pub fn check_generation_preconditions(tale: &Tale) -> Result<(), DomainError> {
    if tale.components.hero_name().is_none() {
        return Err(DomainError::FailedPrecondition(
            "hero is required for generation".into(),
        ));
    }
    if !tale.style.is_specified() {
        return Err(DomainError::FailedPrecondition(
            "tale style is required for generation".into(),
        ));
    }
    if !tale.status.can_begin_generation() {
        return Err(DomainError::FailedPrecondition(
            "generation is already in progress".into(),
        ));
    }
    Ok(())
}

/// Applies a components patch field by field.
#[must_use]
pub fn merge_components(current: &TaleComponents, patch: ComponentsPatch) -> TaleComponents {
    TaleComponents {
        hero: patch.hero.or_else(|| current.hero.clone()),
        friends: patch.friends.unwrap_or_else(|| current.friends.clone()),
        equipment: patch.equipment.unwrap_or_else(|| current.equipment.clone()),
        villains: patch.villains.unwrap_or_else(|| current.villains.clone()),
        places: patch.places.unwrap_or_else(|| current.places.clone()),
    }
}
