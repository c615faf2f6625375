//! Shared test mocks and utilities for the Storyloom tale service.

mod clock;
mod fixtures;
mod generator;
mod repository;

pub use clock::{FixedClock, ManualClock};
pub use fixtures::{catalog_entry, sample_profile, sample_tale};
pub use generator::{ScriptedGenerator, StalledGenerator};
pub use repository::{
    FailingCatalogRepository, FailingTaleRepository, InMemoryProfileRepository,
    InMemoryTaleRepository, StaticCatalogRepository,
};
