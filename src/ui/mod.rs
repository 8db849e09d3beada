//! ui
//!
//! User-facing output utilities.

pub mod output;

pub use output::{error, Verbosity};
