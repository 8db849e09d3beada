//! Semrel - release-cycle automation for GitLab projects
//!
//! Semrel is a single-binary tool that computes and applies semantic-version
//! tags, release branches, and release records against a GitLab project:
//! bumping release-candidate tags, cutting `release/<major>.<minor>` branches,
//! creating fix tags, and publishing changelog-backed releases.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the release layer)
//! - [`core`] - Domain types, pure version resolution, and configuration
//! - [`release`] - Orchestrates branch/tag/release sequencing and changelog assembly
//! - [`gateway`] - Single interface for all remote repository operations
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! Semrel maintains the following invariants:
//!
//! 1. Version resolution is pure: it operates on one tag snapshot and never
//!    performs I/O or raises for "no data found"
//! 2. Every produced tag name matches its release-cycle pattern
//! 3. Release-branch creation is idempotent; an existing branch is reused
//! 4. Tags are only created on commits reachable from the resolving branch

pub mod cli;
pub mod core;
pub mod gateway;
pub mod release;
pub mod ui;
