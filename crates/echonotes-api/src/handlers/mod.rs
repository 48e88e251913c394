//! HTTP handlers for echonotes-api.

pub mod notes;
pub mod system;
