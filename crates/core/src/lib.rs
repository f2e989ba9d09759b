//! Domain types, errors and validation shared by the notes crates.

pub mod error;
pub mod notes;
pub mod types;
