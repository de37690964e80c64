//! Yardline Core — domain models, repository traits and the shared
//! error taxonomy used by every other crate in the workspace.

pub mod error;
pub mod models;
pub mod repository;
