//! Prompt domain
//!
//! Templates for the writer and reviewer prompts. Reviewer feedback reaches
//! the next writer turn only through these texts.

mod template;

pub use template::PromptTemplate;
