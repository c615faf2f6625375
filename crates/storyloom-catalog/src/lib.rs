//! Component Catalog bounded context.
//!
//! Serves the read-only catalog of selectable story components, localized
//! and grouped per language, behind a short-lived read-through cache.

pub mod application;
pub mod domain;
