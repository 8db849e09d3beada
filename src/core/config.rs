//! core::config
//!
//! Explicit run configuration, built once at startup and passed by reference
//! into the orchestrator and gateway. There is no process-wide mutable
//! defaults table.

use std::time::Duration;

/// Suffix marking a release-candidate tag.
pub const RC_SUFFIX: &str = "-rc";

/// Default prefix for release branches.
pub const RELEASE_PREFIX: &str = "release/";

/// Run configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Release branch prefix, `release/` by default.
    pub release_prefix: String,
    /// Release-candidate tag suffix, `-rc`.
    pub rc_suffix: String,
    /// TCP connect timeout for gateway requests.
    pub connect_timeout: Duration,
    /// Overall per-request timeout for gateway requests.
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            release_prefix: RELEASE_PREFIX.to_string(),
            rc_suffix: RC_SUFFIX.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}
