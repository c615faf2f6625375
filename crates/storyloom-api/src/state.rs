//! Shared application state.

use std::sync::Arc;

use storyloom_catalog::application::catalog_cache::ComponentCatalogCache;
use storyloom_core::clock::Clock;
use storyloom_core::repository::{ProfileRepository, TaleRepository};
use storyloom_tales::application::orchestrator::GenerationOrchestrator;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock>,
    /// Tale persistence.
    pub tale_repository: Arc<dyn TaleRepository>,
    /// Profile persistence.
    pub profile_repository: Arc<dyn ProfileRepository>,
    /// Localized catalog cache.
    pub catalog: Arc<ComponentCatalogCache>,
    /// Generation state machine and detached tasks.
    pub orchestrator: Arc<GenerationOrchestrator>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        tale_repository: Arc<dyn TaleRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        catalog: ComponentCatalogCache,
        orchestrator: GenerationOrchestrator,
    ) -> Self {
        Self {
            clock,
            tale_repository,
            profile_repository,
            catalog: Arc::new(catalog),
            orchestrator: Arc::new(orchestrator),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("orchestrator", &self.orchestrator)
            .finish_non_exhaustive()
    }
}
