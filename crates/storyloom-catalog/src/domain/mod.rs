//! Domain layer for the Component Catalog context.

pub mod localization;
