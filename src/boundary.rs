use std::fmt;

use crate::version::VersionInfo;

/// Non-fatal conditions worth telling the user about before a push.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Working tree has uncommitted changes; the image is not reproducible
    DirtyBuild { version: String },
    /// HEAD is not on a branch
    DetachedHead { commit_hash: String },
    /// Building off something other than the release branch
    NonReleaseBranch { branch: String, release_branch: String },
    /// No node ids were given, the artifact is only staged
    NoNodes { environment: String },
}

impl BoundaryWarning {
    /// Collects the warnings that apply to a resolved version.
    pub fn for_version(info: &VersionInfo, release_branch: &str) -> Vec<BoundaryWarning> {
        let mut warnings = Vec::new();

        if info.branch() == crate::git::DETACHED_HEAD {
            warnings.push(BoundaryWarning::DetachedHead {
                commit_hash: info.commit_hash().to_string(),
            });
        } else if info.branch() != release_branch {
            warnings.push(BoundaryWarning::NonReleaseBranch {
                branch: info.branch().to_string(),
                release_branch: release_branch.to_string(),
            });
        }

        if info.is_dirty() {
            warnings.push(BoundaryWarning::DirtyBuild {
                version: info.version().to_string(),
            });
        }

        warnings
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::DirtyBuild { version } => {
                write!(
                    f,
                    "Working tree has uncommitted changes, version '{}' is timestamped",
                    version
                )
            }
            BoundaryWarning::DetachedHead { commit_hash } => {
                write!(f, "HEAD is detached at {}", commit_hash)
            }
            BoundaryWarning::NonReleaseBranch {
                branch,
                release_branch,
            } => {
                write!(
                    f,
                    "Building from branch '{}', not release branch '{}'",
                    branch, release_branch
                )
            }
            BoundaryWarning::NoNodes { environment } => {
                write!(
                    f,
                    "No node ids given, firmware for '{}' is staged but no device is notified",
                    environment
                )
            }
        }
    }
}
