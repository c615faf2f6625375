//! Domain layer for the Tales context.

pub mod commands;
pub mod rules;
