//! core::version
//!
//! Pure version resolution over a tag snapshot.
//!
//! # Design
//!
//! Every function here is side-effect free: callers take one snapshot of the
//! remote tag list and pass it in, so a single resolution never observes two
//! different remote states. Absence of data is signalled with `Option`, never
//! an error - only the orchestrator and gateway layers raise.
//!
//! Tag classification is pattern-based:
//!
//! - rc tag: `^\d+\.\d+\.\d+-rc$`
//! - release tag: `^\d+\.\d+\.\d+$`
//! - patch release tag: `^\d+\.\d+\.[1-9]\d*$`
//!
//! Any tag name produced by [`next_rc_tag`], [`next_fix_tag`], or
//! [`first_release_tag`] matches the corresponding pattern.

use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use thiserror::Error;

use super::types::Tag;

/// Matches release-candidate tags, e.g. `1.3.0-rc`.
pub static RC_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+-rc$").expect("valid rc tag pattern"));

/// Matches release tags, e.g. `1.3.0`.
pub static RELEASE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid release tag pattern"));

/// Matches patch release tags (patch component >= 1), e.g. `1.3.2`.
pub static PATCH_RELEASE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.[1-9]\d*$").expect("valid patch tag pattern"));

/// Which kind of release a changelog lower bound is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    /// First release of a new (major, minor) line.
    New,
    /// Patch release on an existing release branch.
    Fix,
}

/// Errors from version derivation on malformed input.
///
/// Resolution over a snapshot never errors; only the deterministic name
/// derivations do, and only when handed a tag or branch that cannot be read
/// as a semantic version.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("`{name}` is not a semantic version: {source}")]
    InvalidVersion {
        name: String,
        #[source]
        source: semver::Error,
    },
}

fn parse(name: &str) -> Result<Version, VersionError> {
    Version::parse(name).map_err(|source| VersionError::InvalidVersion {
        name: name.to_string(),
        source,
    })
}

/// The latest release-candidate tag for `major` in the snapshot.
///
/// "Latest" is the first matching entry in snapshot order, whatever order
/// the gateway returned - not the highest version. That is the established
/// contract for rc resolution; platforms list tags newest-first, which is
/// what makes this line up in practice.
pub fn latest_rc_tag(tags: &[Tag], major: u64) -> Option<&Tag> {
    tags.iter().find(|t| {
        RC_TAG_RE.is_match(&t.name)
            && Version::parse(&t.name).is_ok_and(|v| v.major == major)
    })
}

/// The next release-candidate tag name for `major`.
///
/// Bumps the minor component of the latest rc tag (patch reset to 0), or
/// starts the line at `<major>.0.0-rc` when the snapshot holds no rc tag
/// for that major.
pub fn next_rc_tag(tags: &[Tag], major: u64, rc_suffix: &str) -> Result<String, VersionError> {
    match latest_rc_tag(tags, major) {
        Some(latest) => {
            let base = latest.name.replace(rc_suffix, "");
            let v = parse(&base)?;
            Ok(format!("{}.{}.0{}", v.major, v.minor + 1, rc_suffix))
        }
        None => Ok(format!("{}.0.0{}", major, rc_suffix)),
    }
}

/// All release tags in the snapshot, snapshot order preserved.
pub fn release_tags(tags: &[Tag]) -> Vec<&Tag> {
    tags.iter()
        .filter(|t| RELEASE_TAG_RE.is_match(&t.name))
        .collect()
}

/// Release tags matching `branch_base` as an anchored sub-pattern,
/// sorted descending by version.
///
/// The base (e.g. `1.3`) is applied as a regex prefix match against the tag
/// name, so `1.3` selects `1.3.0`, `1.3.1`, and so on.
fn release_tags_for_base<'a>(tags: &'a [Tag], branch_base: &str) -> Vec<(&'a Tag, Version)> {
    let base_re = match Regex::new(&format!("^(?:{})", branch_base)) {
        Ok(re) => re,
        // A base that is not a valid pattern selects nothing.
        Err(_) => return Vec::new(),
    };
    let mut matching: Vec<(&Tag, Version)> = release_tags(tags)
        .into_iter()
        .filter(|t| base_re.is_match(&t.name))
        .filter_map(|t| Version::parse(&t.name).ok().map(|v| (t, v)))
        .collect();
    matching.sort_by(|a, b| b.1.cmp(&a.1));
    matching
}

/// The release tag that bounds the changelog for `new_tag` from below.
///
/// Mode [`ReleaseMode::Fix`] excludes tags on the release branch itself
/// (those matching `branch_base`); mode [`ReleaseMode::New`] considers every
/// release tag. In both modes only tags strictly below `new_tag` qualify,
/// and the highest qualifying version wins. `None` when the project has no
/// earlier release.
pub fn previous_minor_release_tag(
    tags: &[Tag],
    branch_base: &str,
    new_tag: &str,
    mode: ReleaseMode,
) -> Option<String> {
    let new_version = Version::parse(new_tag).ok()?;
    let base_re = Regex::new(&format!("^(?:{})", branch_base)).ok();

    let mut candidates: Vec<Version> = release_tags(tags)
        .into_iter()
        .filter(|t| match (mode, &base_re) {
            (ReleaseMode::Fix, Some(re)) => !re.is_match(&t.name),
            _ => true,
        })
        .filter_map(|t| Version::parse(&t.name).ok())
        .filter(|v| *v < new_version)
        .collect();

    candidates.sort_by(|a, b| b.cmp(a));
    candidates.first().map(|v| v.to_string())
}

/// The next fix tag on the release branch identified by `branch_base`.
///
/// Bumps the patch component of the highest release tag matching the base.
/// `None` when the branch has no prior release tag - the branch was cut but
/// never released, which callers treat as "nothing to do".
pub fn next_fix_tag(tags: &[Tag], branch_base: &str) -> Option<String> {
    let group = release_tags_for_base(tags, branch_base);
    let (_, highest) = group.first()?;
    Some(format!(
        "{}.{}.{}",
        highest.major,
        highest.minor,
        highest.patch + 1
    ))
}

/// The release branch name derived from a source tag.
///
/// Strips the rc suffix if present and keeps the (major, minor) line:
/// `release_branch_name("1.3.0-rc", "release/", "-rc")` is `release/1.3`.
/// The derivation is deterministic; it fails only on input that is not a
/// semantic version.
pub fn release_branch_name(
    source_tag: &str,
    prefix: &str,
    rc_suffix: &str,
) -> Result<String, VersionError> {
    let v = parse(&source_tag.replace(rc_suffix, ""))?;
    Ok(format!("{}{}.{}", prefix, v.major, v.minor))
}

/// The first release tag on a freshly cut release branch.
///
/// Strips the branch prefix and appends `.0`:
/// `first_release_tag("release/1.3", "release/")` is `1.3.0`.
pub fn first_release_tag(release_branch: &str, prefix: &str) -> Result<String, VersionError> {
    let v = parse(&format!("{}.0", release_branch.replace(prefix, "")))?;
    Ok(v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<Tag> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Tag::new(*name, format!("commit{}", i)))
            .collect()
    }

    mod rc_resolution {
        use super::*;

        #[test]
        fn empty_snapshot_starts_the_line() {
            assert_eq!(next_rc_tag(&[], 1, "-rc").unwrap(), "1.0.0-rc");
            assert_eq!(next_rc_tag(&[], 3, "-rc").unwrap(), "3.0.0-rc");
        }

        #[test]
        fn bumps_minor_and_resets_patch() {
            let snapshot = tags(&["1.2.0-rc"]);
            assert_eq!(next_rc_tag(&snapshot, 1, "-rc").unwrap(), "1.3.0-rc");

            let snapshot = tags(&["2.5.7-rc"]);
            assert_eq!(next_rc_tag(&snapshot, 2, "-rc").unwrap(), "2.6.0-rc");
        }

        #[test]
        fn first_match_in_snapshot_order_wins() {
            // Not highest-version; the first matching entry is taken as-is.
            let snapshot = tags(&["1.2.0-rc", "1.9.0-rc"]);
            assert_eq!(
                latest_rc_tag(&snapshot, 1).map(|t| t.name.as_str()),
                Some("1.2.0-rc")
            );
            assert_eq!(next_rc_tag(&snapshot, 1, "-rc").unwrap(), "1.3.0-rc");
        }

        #[test]
        fn other_majors_and_non_rc_tags_are_ignored() {
            let snapshot = tags(&["2.4.0-rc", "1.7.0", "1.7.1", "not-a-tag"]);
            assert!(latest_rc_tag(&snapshot, 1).is_none());
            assert_eq!(next_rc_tag(&snapshot, 1, "-rc").unwrap(), "1.0.0-rc");
        }
    }

    mod release_filters {
        use super::*;

        #[test]
        fn release_tags_excludes_rc_and_noise() {
            let snapshot = tags(&["1.2.0", "1.3.0-rc", "v2", "1.3.0"]);
            let names: Vec<&str> = release_tags(&snapshot)
                .iter()
                .map(|t| t.name.as_str())
                .collect();
            assert_eq!(names, vec!["1.2.0", "1.3.0"]);
        }
    }

    mod previous_minor {
        use super::*;

        #[test]
        fn new_mode_takes_highest_below_new_tag() {
            let snapshot = tags(&["1.2.0", "1.3.0", "1.4.12"]);
            assert_eq!(
                previous_minor_release_tag(&snapshot, "2.0", "2.0.0", ReleaseMode::New),
                Some("1.4.12".to_string())
            );
        }

        #[test]
        fn fix_mode_excludes_own_branch_line() {
            let snapshot = tags(&["1.2.0", "1.3.0", "1.3.1"]);
            assert_eq!(
                previous_minor_release_tag(&snapshot, "1.3", "1.3.2", ReleaseMode::Fix),
                Some("1.2.0".to_string())
            );
        }

        #[test]
        fn none_when_no_earlier_release_exists() {
            assert_eq!(
                previous_minor_release_tag(&[], "1.0", "1.0.0", ReleaseMode::New),
                None
            );
            let snapshot = tags(&["1.0.0"]);
            assert_eq!(
                previous_minor_release_tag(&snapshot, "1.0", "1.0.0", ReleaseMode::Fix),
                None
            );
        }

        #[test]
        fn tags_at_or_above_new_tag_are_ignored() {
            let snapshot = tags(&["1.4.0", "2.0.0", "2.1.0"]);
            assert_eq!(
                previous_minor_release_tag(&snapshot, "2.0", "2.0.0", ReleaseMode::New),
                Some("1.4.0".to_string())
            );
        }
    }

    mod fix_resolution {
        use super::*;

        #[test]
        fn bumps_patch_of_highest_on_branch() {
            let snapshot = tags(&["1.3.0", "1.3.1"]);
            assert_eq!(next_fix_tag(&snapshot, "1.3"), Some("1.3.2".to_string()));
        }

        #[test]
        fn picks_highest_not_listing_order() {
            let snapshot = tags(&["1.3.4", "1.3.11", "1.3.2"]);
            assert_eq!(next_fix_tag(&snapshot, "1.3"), Some("1.3.12".to_string()));
        }

        #[test]
        fn none_for_unreleased_branch() {
            assert_eq!(next_fix_tag(&[], "1.3"), None);
            let snapshot = tags(&["1.2.0", "1.3.0-rc"]);
            assert_eq!(next_fix_tag(&snapshot, "1.3"), None);
        }
    }

    mod name_derivation {
        use super::*;

        #[test]
        fn branch_name_from_rc_tag() {
            assert_eq!(
                release_branch_name("1.3.0-rc", "release/", "-rc").unwrap(),
                "release/1.3"
            );
        }

        #[test]
        fn branch_name_from_plain_tag() {
            assert_eq!(
                release_branch_name("2.0.0", "release/", "-rc").unwrap(),
                "release/2.0"
            );
        }

        #[test]
        fn branch_name_rejects_garbage() {
            assert!(release_branch_name("not-a-version", "release/", "-rc").is_err());
        }

        #[test]
        fn first_tag_from_branch_name() {
            assert_eq!(first_release_tag("release/1.3", "release/").unwrap(), "1.3.0");
        }

        #[test]
        fn custom_prefix_round_trips() {
            let branch = release_branch_name("4.7.0-rc", "rel-", "-rc").unwrap();
            assert_eq!(branch, "rel-4.7");
            assert_eq!(first_release_tag(&branch, "rel-").unwrap(), "4.7.0");
        }
    }

    mod patterns {
        use super::*;

        #[test]
        fn produced_rc_tags_match_rc_pattern() {
            let snapshot = tags(&["1.2.0-rc"]);
            let next = next_rc_tag(&snapshot, 1, "-rc").unwrap();
            assert!(RC_TAG_RE.is_match(&next));
            assert!(RC_TAG_RE.is_match(&next_rc_tag(&[], 9, "-rc").unwrap()));
        }

        #[test]
        fn produced_fix_tags_match_patch_pattern() {
            let snapshot = tags(&["1.3.0"]);
            let next = next_fix_tag(&snapshot, "1.3").unwrap();
            assert!(PATCH_RELEASE_TAG_RE.is_match(&next));
            assert!(RELEASE_TAG_RE.is_match(&next));
        }

        #[test]
        fn first_release_tag_matches_release_pattern() {
            let tag = first_release_tag("release/1.3", "release/").unwrap();
            assert!(RELEASE_TAG_RE.is_match(&tag));
            assert!(!PATCH_RELEASE_TAG_RE.is_match(&tag));
        }

        #[test]
        fn patch_pattern_requires_nonzero_patch() {
            assert!(!PATCH_RELEASE_TAG_RE.is_match("1.3.0"));
            assert!(PATCH_RELEASE_TAG_RE.is_match("1.3.1"));
            assert!(PATCH_RELEASE_TAG_RE.is_match("1.3.10"));
        }
    }
}
