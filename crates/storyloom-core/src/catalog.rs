//! Catalog of selectable story components.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The closed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Hero archetypes.
    Hero,
    /// Friend archetypes.
    Friend,
    /// Villain archetypes.
    Villain,
    /// Places.
    Place,
    /// Equipment.
    Equipment,
    /// Tale styles.
    Style,
}

impl Category {
    /// Parses a stored category tag. Returns `None` for tags outside the
    /// closed set.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hero" => Some(Self::Hero),
            "friend" => Some(Self::Friend),
            "villain" => Some(Self::Villain),
            "place" => Some(Self::Place),
            "equipment" => Some(Self::Equipment),
            "style" => Some(Self::Style),
            _ => None,
        }
    }
}

/// Title and description of a catalog entry in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localization {
    /// Localized title.
    pub title: String,
    /// Localized description.
    pub description: String,
}

/// A catalog entry as stored. The category is kept as the raw tag so that
/// rows written with an unknown tag can still be read and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Entry identifier.
    pub id: String,
    /// Raw category tag.
    pub category: String,
    /// Position within its category.
    pub sort_order: i32,
    /// Image reference (may be empty).
    pub image_url: String,
    /// Whether the entry is offered to users.
    pub is_active: bool,
    /// Localizations keyed by language tag.
    pub translations: BTreeMap<String, Localization>,
}

/// A catalog entry resolved into a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedEntry {
    /// Entry identifier.
    pub id: String,
    /// Category of the entry.
    pub category: Category,
    /// Image reference.
    pub image_url: String,
    /// Position within its category.
    pub sort_order: i32,
    /// Localized title.
    pub title: String,
    /// Localized description.
    pub description: String,
}

/// The catalog grouped into its six buckets, each ordered by sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedCatalog {
    /// Hero entries.
    pub heroes: Vec<LocalizedEntry>,
    /// Friend entries.
    pub friends: Vec<LocalizedEntry>,
    /// Villain entries.
    pub villains: Vec<LocalizedEntry>,
    /// Place entries.
    pub places: Vec<LocalizedEntry>,
    /// Equipment entries.
    pub equipment: Vec<LocalizedEntry>,
    /// Style entries.
    pub tale_styles: Vec<LocalizedEntry>,
}

impl GroupedCatalog {
    /// Returns the bucket for `category`.
    pub fn bucket_mut(&mut self, category: Category) -> &mut Vec<LocalizedEntry> {
        match category {
            Category::Hero => &mut self.heroes,
            Category::Friend => &mut self.friends,
            Category::Villain => &mut self.villains,
            Category::Place => &mut self.places,
            Category::Equipment => &mut self.equipment,
            Category::Style => &mut self.tale_styles,
        }
    }

    /// Total number of entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
            + self.friends.len()
            + self.villains.len()
            + self.places.len()
            + self.equipment.len()
            + self.tale_styles.len()
    }

    /// Whether every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
