//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! Connection settings are global and fall back to the environment, so CI
//! jobs can configure the instance once and select only the mode per step:
//! - `--project` / `GITLAB_TARGET_PROJECT`
//! - `--token` / `GITLAB_API_TOKEN`
//! - `--url` / `GITLAB_URL`
//! - `--release-template` / `GITLAB_RELEASE_TEMPLATE`
//! - `--main-branch` / `GITLAB_MAIN_BRANCH`

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Semrel - semantic release cycles for GitLab projects
#[derive(Parser, Debug)]
#[command(name = "semrel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Target project, full path `group/subgroup/project`
    #[arg(long, global = true, env = "GITLAB_TARGET_PROJECT")]
    pub project: Option<String>,

    /// GitLab API token
    #[arg(long, global = true, env = "GITLAB_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitLab instance URL
    #[arg(long, global = true, env = "GITLAB_URL", default_value = "https://gitlab.com")]
    pub url: String,

    /// Path to the release-notes template
    #[arg(
        long,
        global = true,
        env = "GITLAB_RELEASE_TEMPLATE",
        default_value = "./templates/default.hbs"
    )]
    pub release_template: PathBuf,

    /// Main branch used to cut releases and bound changelogs when no tags exist
    #[arg(long, global = true, env = "GITLAB_MAIN_BRANCH", default_value = "master")]
    pub main_branch: String,

    /// Enable debug output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub mode: Mode,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Release-cycle modes.
#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Create the initial rc tag or bump the latest release-candidate tag
    CreateRcTag {
        /// Branch the commit must belong to
        #[arg(long)]
        branch: String,

        /// Commit hash to tag
        #[arg(long)]
        commit: String,

        /// Major component of the X.x.x release pattern
        #[arg(long, env = "GITLAB_MAJOR_RELEASE", default_value_t = 1)]
        major_version: u64,
    },

    /// Cut the release branch from a tag and create the first release tag
    PromoteRelease {
        /// Release-candidate tag to promote
        #[arg(long)]
        tag: String,
    },

    /// Bump the fix component on an existing release branch
    CreateFixTag {
        /// Release branch to tag
        #[arg(long)]
        branch: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_rc_tag_mode() {
        let cli = Cli::try_parse_from([
            "semrel",
            "--project",
            "group/app",
            "--token",
            "glpat-x",
            "create-rc-tag",
            "--branch",
            "master",
            "--commit",
            "abc123",
        ])
        .unwrap();
        assert_eq!(cli.project.as_deref(), Some("group/app"));
        assert_eq!(cli.url, "https://gitlab.com");
        match cli.mode {
            Mode::CreateRcTag {
                branch,
                commit,
                major_version,
            } => {
                assert_eq!(branch, "master");
                assert_eq!(commit, "abc123");
                assert_eq!(major_version, 1);
            }
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn parses_promote_release_mode() {
        let cli =
            Cli::try_parse_from(["semrel", "promote-release", "--tag", "1.3.0-rc"]).unwrap();
        match cli.mode {
            Mode::PromoteRelease { tag } => assert_eq!(tag, "1.3.0-rc"),
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn rc_mode_requires_branch_and_commit() {
        assert!(Cli::try_parse_from(["semrel", "create-rc-tag", "--branch", "master"]).is_err());
        assert!(Cli::try_parse_from(["semrel", "create-rc-tag", "--commit", "abc"]).is_err());
    }

    #[test]
    fn fix_mode_requires_branch() {
        assert!(Cli::try_parse_from(["semrel", "create-fix-tag"]).is_err());
    }

    #[test]
    fn promote_mode_requires_tag() {
        assert!(Cli::try_parse_from(["semrel", "promote-release"]).is_err());
    }

    #[test]
    fn main_branch_defaults_to_master() {
        let cli =
            Cli::try_parse_from(["semrel", "promote-release", "--tag", "1.0.0-rc"]).unwrap();
        assert_eq!(cli.main_branch, "master");
    }
}
