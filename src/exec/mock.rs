use crate::exec::{CommandOutput, CommandRunner, CommandSpec};
use std::cell::RefCell;
use std::io;

/// How a scripted command should fail
#[derive(Debug, Clone)]
enum Failure {
    Exit(CommandOutput),
    Spawn(io::ErrorKind),
}

/// Records every command and fails the ones matching a scripted rule
pub struct MockRunner {
    calls: RefCell<Vec<CommandSpec>>,
    rules: Vec<(String, String, Failure)>,
}

impl MockRunner {
    /// Create a runner on which every command succeeds
    pub fn new() -> Self {
        MockRunner {
            calls: RefCell::new(Vec::new()),
            rules: Vec::new(),
        }
    }

    /// Exit non-zero when `program` runs with an argument containing `needle`
    pub fn fail_when(
        mut self,
        program: impl Into<String>,
        needle: impl Into<String>,
        output: CommandOutput,
    ) -> Self {
        self.rules
            .push((program.into(), needle.into(), Failure::Exit(output)));
        self
    }

    /// Fail to start `program` at all when an argument contains `needle`
    pub fn unavailable_when(
        mut self,
        program: impl Into<String>,
        needle: impl Into<String>,
        kind: io::ErrorKind,
    ) -> Self {
        self.rules
            .push((program.into(), needle.into(), Failure::Spawn(kind)));
        self
    }

    /// All commands run so far, in order
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Commands run so far for one program
    pub fn calls_to(&self, program: &str) -> Vec<CommandSpec> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &CommandSpec) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(command.clone());

        let rule = self.rules.iter().find(|(program, needle, _)| {
            *program == command.program && command.args.iter().any(|a| a.contains(needle.as_str()))
        });

        match rule {
            Some((_, _, Failure::Exit(output))) => Ok(output.clone()),
            Some((program, _, Failure::Spawn(kind))) => {
                Err(io::Error::new(*kind, format!("{}: unavailable", program)))
            }
            None => Ok(CommandOutput::success()),
        }
    }
}
