//! Session domain: the turn ledger of one generation run.
//!
//! - [`turn::Turn`] — one writer/reviewer exchange
//! - [`entities::IterationSession`] — the validated, append-only ledger
//! - [`completion::SessionStatus`] — pending vs. completed (with reason)
//! - [`continuation::ContinuationState`] — whether to run another turn

pub mod completion;
pub mod continuation;
pub mod entities;
pub mod turn;
