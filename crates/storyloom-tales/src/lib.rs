//! Tale authoring and generation orchestration.
//!
//! Responsible for the tale lifecycle (create, update, delete, list) and for
//! the generation state machine: `Draft`/`Failed`/`Completed` move to
//! `Generating` on request, and a detached task settles the tale into
//! `Completed` or `Failed`.

pub mod application;
pub mod domain;
