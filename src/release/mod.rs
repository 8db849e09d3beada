//! release
//!
//! Release-cycle sequencing: branch lookup/creation, tag creation, changelog
//! assembly, and release publication.
//!
//! # Architecture
//!
//! [`orchestrator`] drives the three release modes. It computes target names
//! via [`crate::core::version`] (pure), reads and mutates remote state via
//! the gateway, and hands changelog data from [`changelog`] to [`template`]
//! for rendering. [`retry`] is the explicit retry policy applied at call
//! sites that need one; nothing here retries implicitly.

pub mod changelog;
pub mod orchestrator;
pub mod retry;
pub mod template;

pub use changelog::ChangelogBuilder;
pub use orchestrator::{ReleaseError, ReleaseOrchestrator};
pub use retry::RetryPolicy;
pub use template::{ReleaseTemplate, TemplateError};
