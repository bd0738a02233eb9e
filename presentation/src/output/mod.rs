//! Output formatting and result files

pub mod console;
pub mod writer;
