//! Record builders shared across test suites.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use storyloom_core::catalog::{CatalogEntry, Localization};
use storyloom_core::profile::UserProfile;
use storyloom_core::tale::{Character, Tale, TaleComponents, TaleStatus, TaleStyle};
use uuid::Uuid;

fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// A draft tale owned by `user_id` with hero "Arthur" and style "adventure".
///
/// # Panics
///
/// Never; the fixed timestamp is valid.
#[must_use]
pub fn sample_tale(user_id: &str) -> Tale {
    Tale {
        id: Uuid::now_v7(),
        user_id: user_id.to_owned(),
        user_name: "Tester".to_owned(),
        title: "The Quest".to_owned(),
        body: String::new(),
        status: TaleStatus::Draft,
        components: TaleComponents {
            hero: Some(Character::named("Arthur")),
            ..TaleComponents::default()
        },
        style: TaleStyle {
            style: "adventure".to_owned(),
            description: String::new(),
        },
        language: "en".to_owned(),
        created_at: fixed_instant(),
        updated_at: fixed_instant(),
    }
}

/// A profile for `user_id` with default preferences.
#[must_use]
pub fn sample_profile(user_id: &str) -> UserProfile {
    UserProfile {
        user_id: user_id.to_owned(),
        user_name: "Tester".to_owned(),
        language: "en".to_owned(),
        timezone: "UTC".to_owned(),
        allow_notifications: true,
        created_at: fixed_instant(),
        updated_at: fixed_instant(),
    }
}

/// An active catalog entry with the given `(language, title)` localizations.
/// Descriptions are derived from the title.
#[must_use]
pub fn catalog_entry(
    id: &str,
    category: &str,
    sort_order: i32,
    localizations: &[(&str, &str)],
) -> CatalogEntry {
    let translations: BTreeMap<String, Localization> = localizations
        .iter()
        .map(|(language, title)| {
            (
                (*language).to_owned(),
                Localization {
                    title: (*title).to_owned(),
                    description: format!("{title} description"),
                },
            )
        })
        .collect();

    CatalogEntry {
        id: id.to_owned(),
        category: category.to_owned(),
        sort_order,
        image_url: format!("https://cdn.example.com/{id}.png"),
        is_active: true,
        translations,
    }
}
