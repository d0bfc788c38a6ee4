use crate::error::{OtaError, Result};
use crate::git::DETACHED_HEAD;
use git2::{DescribeFormatOptions, DescribeOptions, Repository as Git2Repo, StatusOptions};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Vcs {
    repo: Git2Repo,
}

impl Git2Vcs {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            OtaError::vcs(format!(
                "Not in a git repository ({}): {}",
                path.display(),
                e.message()
            ))
        })?;

        Ok(Git2Vcs { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Vcs { repo }
    }
}

impl super::Vcs for Git2Vcs {
    fn latest_tag(&self) -> Result<String> {
        let mut describe_options = DescribeOptions::new();
        describe_options.describe_tags();

        let describe = self
            .repo
            .describe(&describe_options)
            .map_err(|e| OtaError::vcs(format!("Cannot describe HEAD: {}", e.message())))?;

        // Abbreviation size 0 drops the "-<distance>-g<hash>" suffix.
        let mut format_options = DescribeFormatOptions::new();
        format_options.abbreviated_size(0);

        let tag = describe.format(Some(&format_options))?;
        if tag.is_empty() {
            return Err(OtaError::vcs("Describe returned an empty tag name"));
        }

        Ok(tag)
    }

    fn short_commit_hash(&self) -> Result<String> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| OtaError::vcs(format!("Cannot resolve HEAD commit: {}", e.message())))?;

        let short_id = commit.as_object().short_id()?;
        short_id
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| OtaError::vcs("Abbreviated commit id is not valid UTF-8"))
    }

    fn current_branch(&self) -> Result<String> {
        if self.repo.head_detached()? {
            return Ok(DETACHED_HEAD.to_string());
        }

        let head = self
            .repo
            .head()
            .map_err(|e| OtaError::vcs(format!("Cannot read HEAD: {}", e.message())))?;

        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| OtaError::vcs("Branch name is not valid UTF-8"))
    }

    fn is_dirty(&self) -> Result<bool> {
        let mut status_options = StatusOptions::new();
        status_options
            .include_untracked(false)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut status_options))?;

        Ok(!statuses.is_empty())
    }
}
