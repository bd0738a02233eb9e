//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] — the chat model backing both roles
//! - [`topic::Topic`] — a validated product/service description
//! - [`role::AgentRole`] — writer or reviewer
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod model;
pub mod role;
pub mod string;
pub mod topic;
