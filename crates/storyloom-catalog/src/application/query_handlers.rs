//! Query handlers for the Component Catalog context.

use std::sync::Arc;

use storyloom_core::catalog::GroupedCatalog;
use storyloom_core::error::DomainError;

use crate::application::catalog_cache::ComponentCatalogCache;
use crate::domain::localization::FALLBACK_LANGUAGE;

/// Returns the grouped catalog localized into `language`, defaulting to
/// English when no language (or a blank one) is given.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the catalog store fails.
pub async fn get_catalog(
    cache: &ComponentCatalogCache,
    language: Option<&str>,
) -> Result<Arc<GroupedCatalog>, DomainError> {
    let language = language
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(FALLBACK_LANGUAGE);
    cache.get(language).await
}
