//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod generate_slogan;
pub mod iteration;
pub mod list_models;
