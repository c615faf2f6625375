//! Application layer for the User Profile context.

pub mod command_handlers;
pub mod query_handlers;
