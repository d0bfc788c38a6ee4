//! User interface module - terminal output.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing to stdout/stderr

use crate::boundary::BoundaryWarning;
use crate::ota::DeploymentResult;
use crate::version::VersionInfo;

pub mod formatter;

pub use formatter::{format_deployment_summary, format_version_info};

/// Print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Print a boundary warning with a yellow warning icon.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", warning);
}

pub fn display_version_info(info: &VersionInfo) {
    println!("{}", format_version_info(info));
}

pub fn display_deployment_summary(result: &DeploymentResult) {
    println!("{}", format_deployment_summary(result));
}
