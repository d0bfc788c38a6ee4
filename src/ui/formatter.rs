//! Pure formatting functions for UI output.
//!
//! Everything here builds strings; printing happens in the parent module.

use crate::ota::DeploymentResult;
use crate::version::VersionInfo;

/// Format the resolved version information as an aligned block.
///
/// # Arguments
/// * `info` - Version information to show
pub fn format_version_info(info: &VersionInfo) -> String {
    let state = if info.is_dirty() { "dirty" } else { "clean" };
    format!(
        "\x1b[1mVersion:\x1b[0m   {}\n  Tag:       {}\n  Commit:    {}\n  Branch:    {}\n  Tree:      {}\n  Timestamp: {}",
        info.version(),
        info.base_tag(),
        info.commit_hash(),
        info.branch(),
        state,
        info.build_timestamp()
    )
}

/// Format the end-of-run deployment summary.
///
/// Shows the staged artifact, then one line per node with a green check or
/// a red cross and the failure reason.
///
/// # Arguments
/// * `result` - Result of a completed deployment
pub fn format_deployment_summary(result: &DeploymentResult) -> String {
    let mut lines = vec![
        "\n\x1b[1mDeployment Summary:\x1b[0m".to_string(),
        format!("  Version:  {}", result.version),
        format!("  Staged:   {}", result.remote_path),
        format!("  URL:      {}", result.download_url),
    ];

    if result.outcomes.is_empty() {
        lines.push("  Nodes:    none notified".to_string());
    } else {
        lines.push(format!(
            "  Nodes:    {}/{} notified",
            result.outcomes.len() - result.failures().len(),
            result.outcomes.len()
        ));
        for outcome in &result.outcomes {
            match &outcome.result {
                Ok(()) => lines.push(format!("    \x1b[32m✓\x1b[0m {}", outcome.node_id)),
                Err(e) => lines.push(format!("    \x1b[31m✗\x1b[0m {}: {}", outcome.node_id, e)),
            }
        }
    }

    lines.join("\n")
}
