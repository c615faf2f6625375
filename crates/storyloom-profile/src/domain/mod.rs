//! Domain layer for the User Profile context.

pub mod commands;
