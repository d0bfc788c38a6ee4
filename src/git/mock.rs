use crate::error::{OtaError, Result};
use crate::git::{Vcs, DETACHED_HEAD};
use std::cell::Cell;

/// Mock repository state for testing without an actual git repository
pub struct MockVcs {
    tag: Option<String>,
    commit_hash: String,
    branch: String,
    dirty: bool,
    queries: Cell<usize>,
}

impl MockVcs {
    /// Create a clean mock on `main` tagged `v0.1.0`
    pub fn new() -> Self {
        MockVcs {
            tag: Some("v0.1.0".to_string()),
            commit_hash: "0000000".to_string(),
            branch: "main".to_string(),
            dirty: false,
            queries: Cell::new(0),
        }
    }

    /// Set the tag reachable from HEAD
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Simulate a repository with no tags
    pub fn without_tags(mut self) -> Self {
        self.tag = None;
        self
    }

    /// Set the abbreviated HEAD hash
    pub fn with_commit(mut self, hash: impl Into<String>) -> Self {
        self.commit_hash = hash.into();
        self
    }

    /// Set the checked-out branch
    pub fn on_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Simulate a detached HEAD
    pub fn detached(mut self) -> Self {
        self.branch = DETACHED_HEAD.to_string();
        self
    }

    /// Mark the working tree as modified
    pub fn dirty(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Number of queries answered so far
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    fn record(&self) {
        self.queries.set(self.queries.get() + 1);
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn latest_tag(&self) -> Result<String> {
        self.record();
        self.tag
            .clone()
            .ok_or_else(|| OtaError::vcs("No names found, cannot describe anything."))
    }

    fn short_commit_hash(&self) -> Result<String> {
        self.record();
        Ok(self.commit_hash.clone())
    }

    fn current_branch(&self) -> Result<String> {
        self.record();
        Ok(self.branch.clone())
    }

    fn is_dirty(&self) -> Result<bool> {
        self.record();
        Ok(self.dirty)
    }
}
