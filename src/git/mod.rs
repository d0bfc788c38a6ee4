//! Version-control query layer
//!
//! The version resolver only ever needs four read-only answers from the
//! repository, so that is all the [Vcs] trait exposes. The concrete
//! implementations are:
//!
//! - [repository::Git2Vcs]: reads a real repository through the `git2` crate
//! - [mock::MockVcs]: canned answers for tests
//!
//! Code that derives versions should depend on the trait, never on `git2`
//! directly, so it can be exercised without a repository on disk.
//!
//! ```rust
//! # use fw_ota::git::Vcs;
//! # fn example<V: Vcs>(vcs: &V) -> fw_ota::Result<()> {
//! let tag = vcs.latest_tag()?;
//! let dirty = vcs.is_dirty()?;
//! println!("{} (dirty: {})", tag, dirty);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockVcs;
pub use repository::Git2Vcs;

use crate::error::Result;

/// Branch name reported when HEAD does not point at a branch.
pub const DETACHED_HEAD: &str = "HEAD";

/// Read-only repository queries used to derive a firmware version.
///
/// ## Error Handling
///
/// Every query either answers or fails with
/// [OtaError::VcsQuery](crate::error::OtaError::VcsQuery). There is no
/// partial answer: a repository without tags fails [Vcs::latest_tag] rather
/// than returning an empty string.
pub trait Vcs {
    /// Most recent tag reachable from HEAD, lightweight or annotated,
    /// without any commit-distance suffix.
    ///
    /// # Returns
    /// * `Ok(String)` - The tag name (e.g. "v2.3.0")
    /// * `Err` - If no tag is reachable or the repository cannot be read
    fn latest_tag(&self) -> Result<String>;

    /// Abbreviated hash of the commit HEAD points at.
    fn short_commit_hash(&self) -> Result<String>;

    /// Short name of the checked-out branch, or [DETACHED_HEAD].
    fn current_branch(&self) -> Result<String>;

    /// Whether tracked files, staged or not, or submodule checkouts differ
    /// from HEAD. Untracked files are ignored.
    fn is_dirty(&self) -> Result<bool>;
}
