//! core
//!
//! Domain types and pure decision logic for the release cycle.
//!
//! # Architecture
//!
//! Nothing in this module performs I/O. [`version`] computes the next
//! rc/release/fix tag and the changelog lower bound from an in-memory tag
//! snapshot; [`types`] holds the plain immutable records the gateway returns;
//! [`config`] is the explicit configuration struct built once at startup.

pub mod config;
pub mod types;
pub mod version;

pub use config::Config;
pub use types::{Branch, CommitRecord, CommitStats, CommitSummary, DiffEntry, ReleaseRecord, Tag};
