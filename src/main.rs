use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fw_ota::cli::orchestration::{self, PushWorkflowArgs};
use fw_ota::config::{self, Config};
use fw_ota::exec::{CommandRunner, DryRunRunner, SystemRunner};
use fw_ota::{flags, ui};

/// Exit status when staging succeeded but some nodes were not notified.
const EXIT_PARTIAL: u8 = 2;

#[derive(clap::Parser)]
#[command(
    name = "fw-ota",
    version,
    about = "Derive firmware versions from git and push OTA updates to devices"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom settings file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long = "repo",
        global = true,
        default_value = ".",
        help = "Project directory inside the git repository; also holds fw-ota.toml and the build output"
    )]
    repo: PathBuf,

    #[arg(long, global = true, help = "Override the configured release branch")]
    release_branch: Option<String>,

    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version derived from the repository
    Version {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Print version defines for the compiler, one per line
    Flags,

    /// Stage the built firmware and notify devices to update
    Push {
        #[arg(short, long, help = "Build environment to push")]
        env: String,

        #[arg(long, help = "Firmware image to push instead of the build output")]
        artifact: Option<PathBuf>,

        #[arg(long, help = "Print the commands without running them")]
        dry_run: bool,

        #[arg(value_name = "NODE_ID", help = "Devices to notify")]
        node_ids: Vec<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so `fw-ota flags` output stays machine-readable.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = config::load_config(args.config.as_deref(), &args.repo)?;

    match args.command {
        Commands::Version { json } => {
            let info = resolve(&args.repo, &config, args.release_branch.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                ui::display_version_info(&info);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Flags => {
            let info = resolve(&args.repo, &config, args.release_branch.as_deref())?;
            println!("{}", flags::render(&flags::emit(&info)));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Push {
            env,
            artifact,
            dry_run,
            node_ids,
        } => {
            let workflow_args = PushWorkflowArgs {
                repo_dir: args.repo,
                environment: env,
                node_ids,
                artifact,
                release_branch: args.release_branch,
            };
            push(&workflow_args, &config, dry_run)
        }
    }
}

fn resolve(
    repo: &std::path::Path,
    config: &Config,
    release_branch: Option<&str>,
) -> Result<fw_ota::version::VersionInfo> {
    let release_branch = orchestration::release_branch(config, release_branch);
    Ok(orchestration::resolve_version(repo, release_branch)?)
}

fn push(workflow_args: &PushWorkflowArgs, config: &Config, dry_run: bool) -> Result<ExitCode> {
    let runner: &dyn CommandRunner = if dry_run {
        ui::display_status("Dry run: commands are printed, not executed");
        &DryRunRunner
    } else {
        &SystemRunner
    };

    ui::display_status(&format!(
        "Pushing '{}' to {} node(s)",
        workflow_args.environment,
        workflow_args.node_ids.len()
    ));

    let result = orchestration::run_push_workflow(workflow_args, config, runner)?;

    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_success(&format!("Staged {}", result.deployment.remote_path));
    ui::display_deployment_summary(&result.deployment);

    if result.deployment.all_notified() {
        Ok(ExitCode::SUCCESS)
    } else {
        ui::display_error(&format!(
            "{} node(s) were not notified",
            result.deployment.failures().len()
        ));
        Ok(ExitCode::from(EXIT_PARTIAL))
    }
}
