//! Shared domain types and abstractions.
//!
//! This crate defines the records, traits and error types that every
//! bounded context depends on. It contains no infrastructure code.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod generator;
pub mod profile;
pub mod repository;
pub mod tale;
