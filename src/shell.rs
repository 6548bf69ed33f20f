//! Subprocess execution against a process environment context.
//!
//! Commands are argument vectors executed verbatim, with no shell in
//! between, so arguments never pass through string interpolation.
//! Every execution blocks until the child exits; a non-zero exit (or a
//! spawn failure) is the single error signal, surfaced as
//! [`NodestrapError::CommandFailed`].

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::env::ProcessEnvironment;
use crate::error::{NodestrapError, Result};

/// Result of a subprocess that exited successfully.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (always 0 on the success path).
    pub exit_code: i32,

    /// Captured standard output; empty when streaming.
    pub stdout: String,

    /// Captured standard error; empty when streaming.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,
}

/// Execute an argument vector, capturing stdout and stderr.
pub fn execute(argv: &[String], env: &ProcessEnvironment) -> Result<CommandResult> {
    run(argv, env, true)
}

/// Execute an argument vector with stdio inherited from the parent.
///
/// Output flows directly to the parent's streams; the returned result
/// carries only the exit code and duration.
pub fn execute_streaming(argv: &[String], env: &ProcessEnvironment) -> Result<CommandResult> {
    run(argv, env, false)
}

fn run(argv: &[String], env: &ProcessEnvironment, capture: bool) -> Result<CommandResult> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| NodestrapError::InvalidCommand {
            input: String::new(),
            message: "empty argument vector".to_string(),
        })?;

    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(env.cwd())
        .env("PATH", env.path_value());

    if capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|_| NodestrapError::CommandFailed {
            command: display(argv),
            code: None,
        })?;

        if !output.status.success() {
            return Err(NodestrapError::CommandFailed {
                command: display(argv),
                code: output.status.code(),
            });
        }

        Ok(CommandResult {
            exit_code: 0,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        })
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd.status().map_err(|_| NodestrapError::CommandFailed {
            command: display(argv),
            code: None,
        })?;

        if !status.success() {
            return Err(NodestrapError::CommandFailed {
                command: display(argv),
                code: status.code(),
            });
        }

        Ok(CommandResult {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            duration: start.elapsed(),
        })
    }
}

fn display(argv: &[String]) -> String {
    argv.join(" ")
}

/// Runs argument vectors against one fixed executable.
///
/// Two-phase contract: [`configure`](BinaryRunner::configure) binds the
/// executable path, then [`run`](BinaryRunner::run) prepends that path
/// to the given arguments and executes with inherited stdio. Running
/// while unbound is a programming error and fails fast.
#[derive(Debug)]
pub struct BinaryRunner {
    name: &'static str,
    binary_path: Option<PathBuf>,
}

impl BinaryRunner {
    /// Create an unbound runner. `name` identifies it in errors.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            binary_path: None,
        }
    }

    /// Bind the runner to an executable path. Rebinding replaces the
    /// previous path.
    pub fn configure(&mut self, binary_path: impl Into<PathBuf>) {
        self.binary_path = Some(binary_path.into());
    }

    /// Whether the runner has been bound to an executable.
    pub fn is_configured(&self) -> bool {
        self.binary_path.is_some()
    }

    /// Run the bound executable with `args`, streaming output to the
    /// parent's stdio.
    pub fn run(&self, args: &[String], env: &ProcessEnvironment) -> Result<CommandResult> {
        let binary = self
            .binary_path
            .as_ref()
            .ok_or_else(|| NodestrapError::RunnerNotConfigured {
                runner: self.name.to_string(),
            })?;

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(binary.to_string_lossy().into_owned());
        argv.extend(args.iter().cloned());
        execute_streaming(&argv, env)
    }
}
