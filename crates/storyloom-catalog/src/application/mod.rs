//! Application layer for the Component Catalog context.

pub mod catalog_cache;
pub mod query_handlers;
