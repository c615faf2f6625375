//! The tale record and its generation status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a tale's generated body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaleStatus {
    /// Created, never generated.
    Draft,
    /// A detached generation task owns the tale.
    Generating,
    /// The body holds generated text.
    Completed,
    /// The last generation attempt failed.
    Failed,
}

impl TaleStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Generating => "generating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether a fresh generation request may move the tale to `Generating`.
    #[must_use]
    pub fn can_begin_generation(self) -> bool {
        !matches!(self, Self::Generating)
    }
}

impl fmt::Display for TaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "generating" => Ok(Self::Generating),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown tale status: {other}")),
        }
    }
}

/// A named character in a tale (hero, friend or villain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Archetype picked from the catalog (knight, wizard, dragon, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}

impl Character {
    /// Creates a character with a name and no archetype.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archetype: None,
        }
    }
}

/// An item carried by the characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A location in which the tale takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Display name.
    pub name: String,
    /// Kind of place (forest, castle, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// The story components a tale is generated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaleComponents {
    /// The protagonist. Required at creation; must be named for generation.
    #[serde(default)]
    pub hero: Option<Character>,
    /// Companions, in order.
    #[serde(default)]
    pub friends: Vec<Character>,
    /// Items, in order.
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    /// Antagonists, in order.
    #[serde(default)]
    pub villains: Vec<Character>,
    /// Locations, in order.
    #[serde(default)]
    pub places: Vec<Place>,
}

impl TaleComponents {
    /// Returns the hero's name when a hero is present and named.
    #[must_use]
    pub fn hero_name(&self) -> Option<&str> {
        self.hero
            .as_ref()
            .map(|hero| hero.name.trim())
            .filter(|name| !name.is_empty())
    }
}

/// Narrative style of a tale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaleStyle {
    /// Style name (adventure, bedtime, ...).
    #[serde(default)]
    pub style: String,
    /// Optional free-text refinement.
    #[serde(default)]
    pub description: String,
}

impl TaleStyle {
    /// Whether the style name is non-blank.
    #[must_use]
    pub fn is_specified(&self) -> bool {
        !self.style.trim().is_empty()
    }
}

/// A user-authored tale.
///
/// `status == Completed` implies a non-empty body; every write path keeps
/// that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tale {
    /// Tale identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: String,
    /// Owner's display name at creation time.
    pub user_name: String,
    /// Non-empty title.
    pub title: String,
    /// Generated or edited text.
    pub body: String,
    /// Generation status.
    pub status: TaleStatus,
    /// Story components.
    pub components: TaleComponents,
    /// Narrative style.
    pub style: TaleStyle,
    /// Language tag the tale is written in.
    pub language: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Tale {
    /// Whether `caller_id` owns this tale.
    #[must_use]
    pub fn is_owned_by(&self, caller_id: &str) -> bool {
        self.user_id == caller_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_persisted_form() {
        for status in [
            TaleStatus::Draft,
            TaleStatus::Generating,
            TaleStatus::Completed,
            TaleStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<TaleStatus>(), Ok(status));
        }
        assert!("archived".parse::<TaleStatus>().is_err());
    }

    #[test]
    fn test_only_generating_blocks_a_new_generation() {
        assert!(TaleStatus::Draft.can_begin_generation());
        assert!(TaleStatus::Failed.can_begin_generation());
        assert!(TaleStatus::Completed.can_begin_generation());
        assert!(!TaleStatus::Generating.can_begin_generation());
    }

    #[test]
    fn test_hero_name_ignores_blank_names() {
        let mut components = TaleComponents::default();
        assert_eq!(components.hero_name(), None);

        components.hero = Some(Character::named("   "));
        assert_eq!(components.hero_name(), None);

        components.hero = Some(Character::named("Arthur"));
        assert_eq!(components.hero_name(), Some("Arthur"));
    }

    #[test]
    fn test_components_deserialize_with_missing_lists() {
        let components: TaleComponents =
            serde_json::from_value(serde_json::json!({ "hero": { "name": "Arthur", "type": "knight" } }))
                .unwrap();

        let hero = components.hero.unwrap();
        assert_eq!(hero.name, "Arthur");
        assert_eq!(hero.archetype.as_deref(), Some("knight"));
        assert!(components.friends.is_empty());
        assert!(components.places.is_empty());
    }
}
