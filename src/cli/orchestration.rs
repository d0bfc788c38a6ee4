//! Workflow orchestration behind the CLI subcommands
//!
//! Keeps argument parsing in `main.rs` and the actual pipeline here, so the
//! workflows can be driven programmatically with an injected
//! [CommandRunner].

use std::path::{Path, PathBuf};

use tracing::info;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::error::Result;
use crate::exec::CommandRunner;
use crate::git::Git2Vcs;
use crate::ota::{DeploymentResult, DeploymentTarget, Deployer};
use crate::version::{VersionInfo, VersionResolver};

/// Arguments for the push workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct PushWorkflowArgs {
    /// Directory inside the repository to version
    pub repo_dir: PathBuf,

    /// Build environment whose artifact is pushed
    pub environment: String,

    /// Nodes to notify, possibly none
    pub node_ids: Vec<String>,

    /// Overrides the `<repo_dir>/<build.dir>/<env>/firmware.bin` convention
    pub artifact: Option<PathBuf>,

    /// Overrides `version.release_branch`
    pub release_branch: Option<String>,
}

/// Result of a successful push workflow
#[derive(Debug)]
pub struct WorkflowResult {
    pub info: VersionInfo,
    pub deployment: DeploymentResult,
    pub warnings: Vec<BoundaryWarning>,
}

/// Release branch from the override or the settings file.
pub fn release_branch<'a>(config: &'a Config, override_branch: Option<&'a str>) -> &'a str {
    override_branch.unwrap_or(config.version.release_branch.as_str())
}

/// Resolves version information for the repository containing `repo_dir`.
pub fn resolve_version(repo_dir: &Path, release_branch: &str) -> Result<VersionInfo> {
    let vcs = Git2Vcs::open(repo_dir)?;
    VersionResolver::new(release_branch).resolve(&vcs)
}

/// Push workflow
///
/// 1. Validate `[ota]` settings
/// 2. Resolve the version from the repository
/// 3. Stage the artifact and notify the nodes
///
/// Steps 1 and 2 never touch the network, so configuration and repository
/// problems fail before any remote command.
///
/// # Arguments
///
/// * `args` - Workflow arguments
/// * `config` - Loaded settings
/// * `runner` - Executes ssh/scp/mosquitto_pub
pub fn run_push_workflow<R: CommandRunner + ?Sized>(
    args: &PushWorkflowArgs,
    config: &Config,
    runner: &R,
) -> Result<WorkflowResult> {
    let settings = config.ota_settings()?;

    let release_branch = release_branch(config, args.release_branch.as_deref());
    let info = resolve_version(&args.repo_dir, release_branch)?;
    info!(version = %info.version(), environment = %args.environment, "Pushing firmware");

    let mut warnings = BoundaryWarning::for_version(&info, release_branch);
    if args.node_ids.is_empty() {
        warnings.push(BoundaryWarning::NoNodes {
            environment: args.environment.clone(),
        });
    }

    let artifact = args
        .artifact
        .clone()
        .unwrap_or_else(|| config.artifact_path(&args.repo_dir, &args.environment));
    let target = DeploymentTarget::new(
        args.environment.as_str(),
        &settings,
        artifact,
        args.node_ids.clone(),
    );

    let deployment = Deployer::from_settings(runner, &settings).deploy(&target, &info)?;

    Ok(WorkflowResult {
        info,
        deployment,
        warnings,
    })
}
