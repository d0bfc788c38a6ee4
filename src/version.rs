use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::git::Vcs;

/// Format of [VersionInfo::build_timestamp], e.g. `20240101120000`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Release branch used when none is configured.
pub const DEFAULT_RELEASE_BRANCH: &str = "main";

/// Version information derived from the repository state at build time.
///
/// Constructed once per run by [VersionResolver] and read through accessors
/// afterwards; nothing mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    base_tag: String,
    commit_hash: String,
    branch: String,
    is_dirty: bool,
    build_timestamp: String,
    version: String,
}

impl VersionInfo {
    /// Most recent tag reachable from HEAD.
    pub fn base_tag(&self) -> &str {
        &self.base_tag
    }

    /// Abbreviated HEAD commit hash.
    pub fn commit_hash(&self) -> &str {
        &self.commit_hash
    }

    /// Checked-out branch, or `HEAD` when detached.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Local time of resolution, `YYYYMMDDHHMMSS`.
    pub fn build_timestamp(&self) -> &str {
        &self.build_timestamp
    }

    /// Display version, e.g. `v2.3.0-[feature-x]-20240101120000`.
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.version)
    }
}

/// Builds the display version from its parts.
///
/// The tag is suffixed with `-[branch]` when building off the release branch,
/// then with `-<timestamp>` when the working tree is dirty.
///
/// # Example
/// ```
/// use fw_ota::version::compose_version;
///
/// assert_eq!(compose_version("v2.3.0", "main", "main", false, "20240101120000"), "v2.3.0");
/// assert_eq!(
///     compose_version("v2.3.0", "feature-x", "main", true, "20240101120000"),
///     "v2.3.0-[feature-x]-20240101120000"
/// );
/// ```
pub fn compose_version(
    base_tag: &str,
    branch: &str,
    release_branch: &str,
    dirty: bool,
    timestamp: &str,
) -> String {
    let mut version = base_tag.to_string();

    if branch != release_branch {
        version.push_str("-[");
        version.push_str(branch);
        version.push(']');
    }

    if dirty {
        version.push('-');
        version.push_str(timestamp);
    }

    version
}

/// Derives [VersionInfo] from a [Vcs] for a given release branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionResolver {
    release_branch: String,
}

impl VersionResolver {
    pub fn new(release_branch: impl Into<String>) -> Self {
        VersionResolver {
            release_branch: release_branch.into(),
        }
    }

    pub fn release_branch(&self) -> &str {
        &self.release_branch
    }

    /// Resolves version information stamped with the current local time.
    ///
    /// # Returns
    /// * `Ok(VersionInfo)` - Fully populated version information
    /// * `Err(OtaError::VcsQuery)` - If any repository query fails (no tags, no HEAD, ...)
    pub fn resolve<V: Vcs>(&self, vcs: &V) -> Result<VersionInfo> {
        self.resolve_at(vcs, Local::now())
    }

    /// Resolves version information stamped with `now`.
    pub fn resolve_at<V: Vcs>(&self, vcs: &V, now: DateTime<Local>) -> Result<VersionInfo> {
        let base_tag = vcs.latest_tag()?;
        let commit_hash = vcs.short_commit_hash()?;
        let branch = vcs.current_branch()?;
        let is_dirty = vcs.is_dirty()?;
        let build_timestamp = now.format(TIMESTAMP_FORMAT).to_string();

        let version = compose_version(
            &base_tag,
            &branch,
            &self.release_branch,
            is_dirty,
            &build_timestamp,
        );

        debug!(
            tag = %base_tag,
            commit = %commit_hash,
            branch = %branch,
            dirty = is_dirty,
            version = %version,
            "Resolved firmware version"
        );

        Ok(VersionInfo {
            base_tag,
            commit_hash,
            branch,
            is_dirty,
            build_timestamp,
            version,
        })
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        VersionResolver::new(DEFAULT_RELEASE_BRANCH)
    }
}
