//! cli::commands
//!
//! Mode dispatch and handlers.
//!
//! # Architecture
//!
//! `dispatch` validates the connection preconditions (token, project),
//! builds the gateway and template once, and hands an orchestrator to the
//! per-mode handler. Handlers sequence orchestrator calls; they do not talk
//! to the platform directly.

mod fix_tag;
mod promote;
mod rc_tag;

pub use fix_tag::create_fix_tag;
pub use promote::promote_release;
pub use rc_tag::create_rc_tag;

use anyhow::{Context, Result};

use super::args::{Cli, Mode};
use crate::core::config::Config;
use crate::gateway::gitlab::GitLabGateway;
use crate::release::{ReleaseOrchestrator, ReleaseTemplate};
use crate::ui::output::Verbosity;

/// Dispatch the selected mode.
pub async fn dispatch(cli: Cli, verbosity: Verbosity) -> Result<()> {
    let token = cli
        .token
        .context("GitLab API token is missing; set --token or GITLAB_API_TOKEN")?;
    let project = cli
        .project
        .context("target project is not defined; set --project or GITLAB_TARGET_PROJECT")?;

    let config = Config::default();
    let gateway = GitLabGateway::new(&cli.url, token, &project, &config)?;
    gateway
        .ensure_project()
        .await
        .with_context(|| format!("cannot load project `{}`", project))?;

    let template = ReleaseTemplate::from_file(&cli.release_template)?;
    let orchestrator = ReleaseOrchestrator::new(&gateway, &config, &template, verbosity);

    match cli.mode {
        Mode::CreateRcTag {
            branch,
            commit,
            major_version,
        } => create_rc_tag(&orchestrator, &branch, &commit, major_version).await,
        Mode::PromoteRelease { tag } => {
            promote_release(&orchestrator, &tag, &cli.main_branch).await
        }
        Mode::CreateFixTag { branch } => {
            create_fix_tag(&orchestrator, &branch, &cli.main_branch).await
        }
    }
}
