// Shared helpers for building throwaway git repositories.
#![allow(dead_code)]

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Initialize a repository whose first branch is `main`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");

        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &options).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        TestRepo { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `name` and commit it on the current HEAD
    pub fn commit(&self, name: &str, content: &str, message: &str) -> Oid {
        fs::write(self.path().join(name), content).expect("Could not write file");

        let mut index = self.repo.index().expect("Could not get index");
        index
            .add_path(Path::new(name))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let sig = self.signature();

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Could not create commit")
    }

    pub fn tag_lightweight(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    pub fn tag_annotated(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo
            .tag(name, &object, &self.signature(), "release", false)
            .expect("Could not create annotated tag");
    }

    /// Create `branch` at HEAD and check it out
    pub fn checkout_new_branch(&self, branch: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo.branch(branch, &head, false).unwrap();
        self.repo
            .set_head(&format!("refs/heads/{}", branch))
            .unwrap();
    }

    pub fn detach_head(&self) {
        let oid = self.repo.head().unwrap().target().unwrap();
        self.repo.set_head_detached(oid).unwrap();
    }

    /// Modify a tracked file without committing
    pub fn modify(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).unwrap();
    }

    /// Modify a tracked file and stage it, leaving the work tree equal to the index
    pub fn stage(&self, name: &str, content: &str) {
        fs::write(self.path().join(name), content).unwrap();
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
    }

    /// Commit whatever the index currently holds
    pub fn commit_index(&self, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = self.signature();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Could not create commit")
    }

    /// Register `upstream` as a submodule checked out at `path` and commit it
    pub fn add_submodule(&self, upstream: &TestRepo, path: &str) -> Repository {
        let url = format!("file://{}", upstream.path().display());
        let mut submodule = self
            .repo
            .submodule(&url, Path::new(path), true)
            .expect("Could not add submodule");
        let checkout = submodule.clone(None).expect("Could not clone submodule");
        submodule.add_finalize().expect("Could not finalize submodule");
        self.commit_index("Add submodule");
        checkout
    }

    fn signature(&self) -> Signature<'static> {
        Signature::now("Test User", "test@example.com").unwrap()
    }
}

/// A repository on `main` with a single commit tagged `tag`
pub fn tagged_repo(tag: &str) -> TestRepo {
    let repo = TestRepo::new();
    let oid = repo.commit("README.md", "Initial content\n", "Initial commit");
    repo.tag_lightweight(tag, oid);
    repo
}
