//! User Profile bounded context.
//!
//! Responsible for the per-user profile created on account creation and the
//! preferences (language, timezone, notifications) stored on it.

pub mod application;
pub mod domain;
