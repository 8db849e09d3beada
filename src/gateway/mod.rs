//! gateway
//!
//! Abstraction over the remote repository-hosting platform.
//!
//! # Architecture
//!
//! The `RepositoryGateway` trait is the single seam between the release
//! logic and the hosting platform. The release layer depends only on the
//! trait; [`gitlab`] implements it against the GitLab REST API and [`mock`]
//! provides a deterministic in-memory double for tests.
//!
//! - `traits`: the `RepositoryGateway` trait, its error taxonomy
//! - [`gitlab`]: GitLab implementation over the v4 REST API
//! - [`mock`]: in-memory implementation with recorded operations

pub mod gitlab;
pub mod mock;
mod traits;

pub use traits::{GatewayError, RepositoryGateway};
