//! Application layer for the Tales context.

pub mod command_handlers;
pub mod orchestrator;
pub mod query_handlers;
