//! OTA deployment pipeline
//!
//! A run is linear and single-pass:
//!
//! 1. check configuration and the local artifact (no remote action yet)
//! 2. stage the artifact on the distribution host (`ssh mkdir -p`, `scp`)
//! 3. publish the download URL to each node's command topic
//!
//! Staging failures abort the run. Notification failures are collected per
//! node in [DeploymentResult::outcomes] and never abort the others.

pub mod notify;
pub mod stage;

pub use notify::{command_topic, NodeOutcome, Notifier};
pub use stage::{remote_filename, stage};

use std::path::PathBuf;

use tracing::info;

use crate::config::OtaSettings;
use crate::error::{OtaError, Result};
use crate::exec::CommandRunner;
use crate::version::VersionInfo;

/// What to ship and where, for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    /// Build variant whose artifact is shipped, e.g. `esp32-co2`
    pub environment_name: String,
    pub remote_host: String,
    pub remote_base_path: String,
    pub public_url_base: String,
    pub local_artifact_path: PathBuf,
    /// Nodes to notify; empty means stage only
    pub node_ids: Vec<String>,
}

impl DeploymentTarget {
    pub fn new(
        environment_name: impl Into<String>,
        settings: &OtaSettings,
        local_artifact_path: impl Into<PathBuf>,
        node_ids: Vec<String>,
    ) -> Self {
        DeploymentTarget {
            environment_name: environment_name.into(),
            remote_host: settings.host.clone(),
            remote_base_path: settings.path.clone(),
            public_url_base: settings.url.clone(),
            local_artifact_path: local_artifact_path.into(),
            node_ids,
        }
    }

    /// Directory on the remote host the artifact is copied into.
    pub fn remote_dir(&self) -> String {
        stage::join_segments(&self.remote_base_path, &[&self.environment_name])
    }

    /// Public URL devices download `filename` from.
    pub fn download_url(&self, filename: &str) -> String {
        stage::join_segments(&self.public_url_base, &[&self.environment_name, filename])
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("environment", &self.environment_name),
            ("ota.host", &self.remote_host),
            ("ota.path", &self.remote_base_path),
            ("ota.url", &self.public_url_base),
        ];

        for (key, value) in fields {
            if value.trim().is_empty() {
                return Err(OtaError::config(format!("missing key '{}'", key)));
            }
        }

        // The environment name is part of the remote path given to scp.
        if !self.environment_name.chars().all(stage::is_remote_safe) {
            return Err(OtaError::config(format!(
                "invalid environment name '{}'",
                self.environment_name
            )));
        }

        Ok(())
    }
}

/// Summary of a completed deployment.
#[derive(Debug)]
pub struct DeploymentResult {
    pub version: String,
    pub remote_filename: String,
    /// `host:path` of the staged artifact
    pub remote_path: String,
    pub download_url: String,
    pub outcomes: Vec<NodeOutcome>,
}

impl DeploymentResult {
    /// Outcomes of nodes that were not notified
    pub fn failures(&self) -> Vec<&NodeOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success()).collect()
    }

    /// True when every requested node was notified (vacuously true for none)
    pub fn all_notified(&self) -> bool {
        self.outcomes.iter().all(NodeOutcome::is_success)
    }
}

/// Runs the staging and notification pipeline through a [CommandRunner].
pub struct Deployer<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    broker: String,
    namespace: String,
}

impl<'a, R: CommandRunner + ?Sized> Deployer<'a, R> {
    pub fn new(runner: &'a R, broker: impl Into<String>, namespace: impl Into<String>) -> Self {
        Deployer {
            runner,
            broker: broker.into(),
            namespace: namespace.into(),
        }
    }

    /// Build a deployer from validated settings
    pub fn from_settings(runner: &'a R, settings: &OtaSettings) -> Self {
        Deployer::new(runner, settings.broker.clone(), settings.namespace.clone())
    }

    /// Stages the artifact for `info` and notifies every target node.
    ///
    /// # Returns
    /// * `Ok(DeploymentResult)` - Staging succeeded; per-node outcomes inside
    /// * `Err(OtaError::Configuration)` - Before any command, if settings are incomplete
    /// * `Err(OtaError::ArtifactMissing)` - Before any command, if the artifact is absent
    /// * `Err(OtaError::Staging)` - If directory creation or copy failed; no node is notified
    pub fn deploy(&self, target: &DeploymentTarget, info: &VersionInfo) -> Result<DeploymentResult> {
        target.validate()?;
        if !target.node_ids.is_empty() {
            if self.broker.trim().is_empty() {
                return Err(OtaError::config("missing key 'ota.broker'"));
            }
            if self.namespace.trim().is_empty() {
                return Err(OtaError::config("missing key 'ota.namespace'"));
            }
        }

        if !target.local_artifact_path.is_file() {
            return Err(OtaError::ArtifactMissing(target.local_artifact_path.clone()));
        }

        let filename = remote_filename(info.version());
        let remote_path = stage(
            self.runner,
            &target.remote_host,
            &target.remote_dir(),
            &target.local_artifact_path,
            &filename,
        )?;
        info!(version = %info.version(), path = %remote_path, "Firmware staged");

        let download_url = target.download_url(&filename);
        let outcomes = Notifier::new(self.runner, &self.broker, &self.namespace)
            .notify_all(&target.node_ids, &download_url);

        Ok(DeploymentResult {
            version: info.version().to_string(),
            remote_filename: filename,
            remote_path,
            download_url,
            outcomes,
        })
    }
}
