//! Client for the external tale-generation backend.
//!
//! The backend is an opaque HTTP endpoint taking story components and a
//! style and answering with loosely-shaped JSON that holds the tale text.

pub mod extraction;
pub mod http_generator;

pub use http_generator::HttpTaleGenerator;
