//! Localization fallback and category grouping for catalog entries.

use storyloom_core::catalog::{Category, CatalogEntry, GroupedCatalog, Localization, LocalizedEntry};
use tracing::warn;

/// Language used when the requested one has no localization.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Title used when an entry has no localizations at all.
pub const PLACEHOLDER_TITLE: &str = "Unknown";

/// Description used when an entry has no localizations at all.
pub const PLACEHOLDER_DESCRIPTION: &str = "No description available";

/// Picks the localization for `language`: exact match, then English, then
/// the first localization the entry has, then a placeholder.
#[must_use]
pub fn resolve_localization(entry: &CatalogEntry, language: &str) -> Localization {
    entry
        .translations
        .get(language)
        .or_else(|| entry.translations.get(FALLBACK_LANGUAGE))
        .or_else(|| entry.translations.values().next())
        .cloned()
        .unwrap_or_else(|| Localization {
            title: PLACEHOLDER_TITLE.to_owned(),
            description: PLACEHOLDER_DESCRIPTION.to_owned(),
        })
}

/// Localizes `entries` into `language` and groups them into the six
/// category buckets, preserving input order within each bucket. Entries
/// with an unknown category tag are skipped with a warning.
#[must_use]
pub fn group_entries(entries: &[CatalogEntry], language: &str) -> GroupedCatalog {
    let mut grouped = GroupedCatalog::default();

    for entry in entries {
        let Some(category) = Category::from_tag(&entry.category) else {
            warn!(
                entry_id = %entry.id,
                category = %entry.category,
                "skipping catalog entry with unknown category"
            );
            continue;
        };

        let localization = resolve_localization(entry, language);
        grouped.bucket_mut(category).push(LocalizedEntry {
            id: entry.id.clone(),
            category,
            image_url: entry.image_url.clone(),
            sort_order: entry.sort_order,
            title: localization.title,
            description: localization.description,
        });
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_test_support::catalog_entry;

    #[test]
    fn test_resolve_prefers_requested_language() {
        let entry = catalog_entry("knight", "hero", 1, &[("en", "Knight"), ("fr", "Chevalier")]);

        let localization = resolve_localization(&entry, "fr");

        assert_eq!(localization.title, "Chevalier");
    }

    #[test]
    fn test_resolve_falls_back_to_english() {
        let entry = catalog_entry("knight", "hero", 1, &[("de", "Ritter"), ("en", "Knight")]);

        let localization = resolve_localization(&entry, "fr");

        assert_eq!(localization.title, "Knight");
    }

    #[test]
    fn test_resolve_falls_back_to_first_available() {
        let entry = catalog_entry("knight", "hero", 1, &[("es", "Caballero"), ("de", "Ritter")]);

        let localization = resolve_localization(&entry, "fr");

        // Localizations are keyed in a sorted map, so "de" comes first.
        assert_eq!(localization.title, "Ritter");
    }

    #[test]
    fn test_resolve_uses_placeholder_without_localizations() {
        let entry = catalog_entry("knight", "hero", 1, &[]);

        let localization = resolve_localization(&entry, "fr");

        assert_eq!(localization.title, PLACEHOLDER_TITLE);
        assert_eq!(localization.description, PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn test_group_entries_buckets_by_category_in_input_order() {
        // Arrange
        let entries = vec![
            catalog_entry("knight", "hero", 1, &[("en", "Knight")]),
            catalog_entry("forest", "place", 2, &[("en", "Forest")]),
            catalog_entry("wizard", "hero", 3, &[("en", "Wizard")]),
            catalog_entry("sword", "equipment", 4, &[("en", "Sword")]),
            catalog_entry("fox", "friend", 5, &[("en", "Fox")]),
            catalog_entry("dragon", "villain", 6, &[("en", "Dragon")]),
            catalog_entry("bedtime", "style", 7, &[("en", "Bedtime")]),
        ];

        // Act
        let grouped = group_entries(&entries, "en");

        // Assert
        let hero_ids: Vec<&str> = grouped.heroes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(hero_ids, ["knight", "wizard"]);
        assert_eq!(grouped.places[0].title, "Forest");
        assert_eq!(grouped.equipment[0].category, Category::Equipment);
        assert_eq!(grouped.friends.len(), 1);
        assert_eq!(grouped.villains.len(), 1);
        assert_eq!(grouped.tale_styles[0].id, "bedtime");
        assert_eq!(grouped.len(), 7);
    }

    #[test]
    fn test_group_entries_skips_unknown_category() {
        let entries = vec![
            catalog_entry("knight", "hero", 1, &[("en", "Knight")]),
            catalog_entry("unicorn", "mount", 2, &[("en", "Unicorn")]),
        ];

        let grouped = group_entries(&entries, "en");

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.heroes[0].id, "knight");
    }
}
