//! Review domain
//!
//! Interpreting the reviewer's free-form response. No I/O, only text rules.

pub mod approval;

pub use approval::{APPROVAL_PHRASE, is_approved};
