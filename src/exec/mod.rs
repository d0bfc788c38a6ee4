//! External command execution
//!
//! Every remote action (remote shell, secure copy, publish) is a child
//! process started from an explicit argument vector, never a local shell
//! string. The remote shell behind `ssh` only ever sees [shell_quote]d paths.

pub mod mock;

pub use mock::MockRunner;

use std::fmt;
use std::process::Command;

use tracing::{debug, info};

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with nothing captured
    pub fn success() -> Self {
        CommandOutput {
            code: Some(0),
            ..Default::default()
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// One-line description of a failure for error messages
    pub fn describe_failure(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        }
    }
}

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Quotes `arg` for a POSIX shell.
///
/// Only needed where a remote shell re-parses arguments (`ssh host cmd ...`)
/// or where the consumer is a build tool that splits flags shell-style.
pub fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

/// Runs external commands to completion.
///
/// `Err` means the command could not be started at all; a command that ran
/// and exited non-zero is an `Ok` output with a non-zero code.
pub trait CommandRunner {
    fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput> {
        debug!(command = %command, "Running command");

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(command = %command.program, code = ?result.code, "Command finished");
        Ok(result)
    }
}

/// Logs commands instead of running them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &CommandSpec) -> std::io::Result<CommandOutput> {
        info!(command = %command, "Dry run, not executing");
        println!("  would run: {}", command);
        Ok(CommandOutput::success())
    }
}
