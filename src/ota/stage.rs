use std::path::Path;

use tracing::info;

use crate::error::{OtaError, Result};
use crate::exec::{shell_quote, CommandRunner, CommandSpec};

/// Non-interactive ssh/scp: fail instead of prompting for a password.
const BATCH_MODE: &str = "BatchMode=yes";

/// File name the artifact gets on the distribution host.
///
/// The name ends up in the remote path handed to `scp`, which a remote shell
/// may expand, so every character outside `[A-Za-z0-9._+\[\]-]` becomes `_`.
pub fn remote_filename(version: &str) -> String {
    let safe: String = version
        .chars()
        .map(|c| if is_remote_safe(c) { c } else { '_' })
        .collect();
    format!("fw_{}.bin", safe)
}

/// Characters a remote path component may carry unquoted.
pub fn is_remote_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+' | '[' | ']')
}

/// Joins path or URL segments with exactly one `/` between them.
pub fn join_segments(base: &str, rest: &[&str]) -> String {
    let mut joined = base.trim_end_matches('/').to_string();
    for segment in rest {
        joined.push('/');
        joined.push_str(segment.trim_matches('/'));
    }
    joined
}

/// Creates `remote_dir` on `host` and copies `artifact` into it as `filename`.
///
/// Both steps must exit zero. A directory created before a failed copy is
/// left in place.
///
/// # Returns
/// * `Ok(String)` - The `host:path` the artifact now lives at
/// * `Err(OtaError::Staging)` - If either command fails or cannot be started
pub fn stage<R: CommandRunner + ?Sized>(
    runner: &R,
    host: &str,
    remote_dir: &str,
    artifact: &Path,
    filename: &str,
) -> Result<String> {
    let mkdir = CommandSpec::new("ssh")
        .arg("-o")
        .arg(BATCH_MODE)
        .arg(host)
        .arg("mkdir")
        .arg("-p")
        .arg("--")
        .arg(shell_quote(remote_dir));

    info!(host = %host, dir = %remote_dir, "Ensuring remote directory");
    run_step(runner, &mkdir, "remote directory creation")?;

    let destination = format!("{}:{}", host, join_segments(remote_dir, &[filename]));
    let copy = CommandSpec::new("scp")
        .arg("-o")
        .arg(BATCH_MODE)
        .arg(artifact.to_string_lossy())
        .arg(destination.as_str());

    info!(artifact = %artifact.display(), destination = %destination, "Copying firmware");
    run_step(runner, &copy, "artifact transfer")?;

    Ok(destination)
}

fn run_step<R: CommandRunner + ?Sized>(runner: &R, command: &CommandSpec, step: &str) -> Result<()> {
    let output = runner.run(command).map_err(|e| {
        OtaError::staging(format!("{} could not start '{}': {}", step, command.program, e))
    })?;

    if !output.is_success() {
        return Err(OtaError::staging(format!(
            "{} failed ({})",
            step,
            output.describe_failure()
        )));
    }

    Ok(())
}
