//! Commands for the Tales context.

use storyloom_core::tale::{Character, Equipment, Place, TaleComponents, TaleStyle};
use uuid::Uuid;

/// Command to create a draft tale.
#[derive(Debug, Clone)]
pub struct CreateTale {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The authenticated caller, who becomes the owner.
    pub user_id: String,
    /// Title; must be non-blank.
    pub title: String,
    /// Story components; a hero is required.
    pub components: TaleComponents,
    /// Narrative style; the style name must be non-blank.
    pub style: TaleStyle,
}

/// Command to start generating a tale's body.
#[derive(Debug, Clone)]
pub struct RequestGeneration {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tale to generate.
    pub tale_id: Uuid,
    /// The authenticated caller.
    pub caller_id: String,
}

/// Partial replacement of a tale's components. Absent fields are kept.
#[derive(Debug, Clone, Default)]
pub struct ComponentsPatch {
    /// Replacement hero.
    pub hero: Option<Character>,
    /// Replacement friends.
    pub friends: Option<Vec<Character>>,
    /// Replacement equipment.
    pub equipment: Option<Vec<Equipment>>,
    /// Replacement villains.
    pub villains: Option<Vec<Character>>,
    /// Replacement places.
    pub places: Option<Vec<Place>>,
}

/// Command to edit a tale. Absent fields are kept.
#[derive(Debug, Clone)]
pub struct UpdateTale {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tale to edit.
    pub tale_id: Uuid,
    /// The authenticated caller.
    pub caller_id: String,
    /// New title; must be non-blank if given.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New style; the style name must be non-blank if given.
    pub style: Option<TaleStyle>,
    /// Component changes.
    pub components: Option<ComponentsPatch>,
}

/// Command to delete a tale.
#[derive(Debug, Clone)]
pub struct DeleteTale {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The tale to delete.
    pub tale_id: Uuid,
    /// The authenticated caller.
    pub caller_id: String,
}
