//! Route modules organized by bounded context.

pub mod catalog;
pub mod health;
pub mod profile;
pub mod tales;
