//! Entrypoint orchestration: command accumulation, runtime setup, and
//! sequential execution through the package-runner.
//!
//! The [`Entrypoint`] is built once, fed commands builder-style, and
//! then run. `run()` works in three ordered phases: apply the
//! working-directory override, make sure the Node.js distribution is
//! present (installing on first use), then drain the command queue in
//! insertion order through `npx`. The first failure aborts the rest of
//! the queue.

use std::path::PathBuf;

use crate::env::ProcessEnvironment;
use crate::error::{NodestrapError, Result};
use crate::install::NodeInstaller;
use crate::shell::BinaryRunner;

/// Leading token stripped from queued commands before execution.
///
/// Commands written as if invoked through the package manager
/// (`npm install`) are rewritten to run through the package-runner
/// instead: the marker token is dropped and the remainder goes to
/// `npx` verbatim. See [`normalize_for_runner`].
pub const PACKAGE_MANAGER_MARKER: &str = "npm";

/// A command handed to [`Entrypoint::with_command`]: either a single
/// line to be tokenized or a pre-split argument vector taken verbatim.
#[derive(Debug, Clone)]
pub enum CommandInput {
    Line(String),
    Argv(Vec<String>),
}

impl From<&str> for CommandInput {
    fn from(line: &str) -> Self {
        CommandInput::Line(line.to_string())
    }
}

impl From<String> for CommandInput {
    fn from(line: String) -> Self {
        CommandInput::Line(line)
    }
}

impl From<Vec<String>> for CommandInput {
    fn from(argv: Vec<String>) -> Self {
        CommandInput::Argv(argv)
    }
}

impl From<Vec<&str>> for CommandInput {
    fn from(argv: Vec<&str>) -> Self {
        CommandInput::Argv(argv.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for CommandInput {
    fn from(argv: &[&str]) -> Self {
        CommandInput::Argv(argv.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CommandInput {
    fn from(argv: [&str; N]) -> Self {
        CommandInput::Argv(argv.iter().map(|s| s.to_string()).collect())
    }
}

/// Split a command line into an argument vector.
///
/// Whitespace separates tokens; single and double quotes group them; a
/// backslash (outside single quotes) escapes the next character. No
/// substitution, globbing or redirection; this is tokenization only.
/// An unterminated quote or a trailing backslash is an error.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match quote {
            Some('\'') => {
                if c == '\'' {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            Some(_) => match c {
                '"' => quote = None,
                '\\' => escaped = true,
                _ => current.push(c),
            },
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    escaped = true;
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        tokens.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if escaped {
        return Err(NodestrapError::InvalidCommand {
            input: line.to_string(),
            message: "trailing backslash".to_string(),
        });
    }
    if quote.is_some() {
        return Err(NodestrapError::InvalidCommand {
            input: line.to_string(),
            message: "unterminated quote".to_string(),
        });
    }
    if in_word {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Rewrite a queued command for execution through the package-runner.
///
/// The contract is exactly: a leading [`PACKAGE_MANAGER_MARKER`] token
/// is stripped, everything else passes through unchanged. `npm install`
/// therefore executes as `npx install`; a marker anywhere past the
/// first position is left alone.
pub fn normalize_for_runner(mut argv: Vec<String>) -> Vec<String> {
    if argv.first().is_some_and(|token| token == PACKAGE_MANAGER_MARKER) {
        argv.remove(0);
    }
    argv
}

/// Builder-style orchestrator for the container entrypoint.
///
/// # Example
///
/// ```no_run
/// use nodestrap::entrypoint::Entrypoint;
/// use nodestrap::env::ProcessEnvironment;
/// use nodestrap::install::NodeInstaller;
///
/// let env = ProcessEnvironment::from_process().unwrap();
/// let mut entrypoint = Entrypoint::new(env, NodeInstaller::default())
///     .with_command("n8n")
///     .unwrap();
/// entrypoint.run().unwrap();
/// ```
#[derive(Debug)]
pub struct Entrypoint {
    env: ProcessEnvironment,
    installer: NodeInstaller,
    npm_runner: BinaryRunner,
    npx_runner: BinaryRunner,
    commands: Vec<Vec<String>>,
    chdir: Option<PathBuf>,
}

impl Entrypoint {
    pub fn new(env: ProcessEnvironment, installer: NodeInstaller) -> Self {
        Self {
            env,
            installer,
            npm_runner: BinaryRunner::new("npm"),
            npx_runner: BinaryRunner::new("npx"),
            commands: Vec::new(),
            chdir: None,
        }
    }

    /// Append a command to the queue.
    ///
    /// String input is tokenized; vector input is taken verbatim. The
    /// result is normalized with [`normalize_for_runner`] before being
    /// queued. An input that yields no tokens at all is rejected here
    /// rather than at execution time.
    pub fn with_command(mut self, command: impl Into<CommandInput>) -> Result<Self> {
        let argv = match command.into() {
            CommandInput::Line(line) => {
                let argv = tokenize(&line)?;
                if argv.is_empty() {
                    return Err(NodestrapError::InvalidCommand {
                        input: line,
                        message: "empty command".to_string(),
                    });
                }
                argv
            }
            CommandInput::Argv(argv) => {
                if argv.is_empty() {
                    return Err(NodestrapError::InvalidCommand {
                        input: String::new(),
                        message: "empty argument vector".to_string(),
                    });
                }
                argv
            }
        };
        self.commands.push(normalize_for_runner(argv));
        Ok(self)
    }

    /// Override the working directory before setup and execution.
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chdir = Some(dir.into());
        self
    }

    /// Queued commands after normalization, in insertion order.
    pub fn queued_commands(&self) -> &[Vec<String>] {
        &self.commands
    }

    /// The environment context the entrypoint operates on.
    pub fn env(&self) -> &ProcessEnvironment {
        &self.env
    }

    /// Set up the runtime and execute every queued command in order.
    ///
    /// A command that exits non-zero fails the run immediately; later
    /// queued commands are not executed.
    pub fn run(&mut self) -> Result<()> {
        self.setup()?;

        for command in &self.commands {
            tracing::info!("Running {}", command.join(" "));
            let result = self.npx_runner.run(command, &self.env)?;
            tracing::info!("Command completed in {:.2?}", result.duration);
        }
        Ok(())
    }

    /// Apply the cwd override, install the distribution when missing,
    /// bind the runners, and put the distribution's `bin` directory on
    /// the search path exactly once.
    fn setup(&mut self) -> Result<()> {
        if let Some(dir) = &self.chdir {
            self.env.set_cwd(dir.clone())?;
            // Store the resolved form; a relative override must not
            // compound across repeated runs.
            self.chdir = Some(self.env.cwd().to_path_buf());
        }

        if !self.installer.is_installed(&self.env) {
            self.installer.install(&mut self.env)?;
        }

        self.npm_runner.configure(self.installer.npm_path(&self.env));
        self.npx_runner.configure(self.installer.npx_path(&self.env));

        let bin_dir = self.installer.bin_dir(&self.env);
        if self.env.prepend_path_if_absent(bin_dir.clone()) {
            tracing::debug!("Added {} to PATH", bin_dir.display());
        }
        Ok(())
    }
}
