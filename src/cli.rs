//! Command-line interface.
//!
//! Argument definitions use clap's derive macros. The CLI only
//! parameterizes what the orchestrator is constructed with: version,
//! OS, architecture, target folder, working directory and the command
//! queue. Everything else is fixed behavior.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::entrypoint::Entrypoint;
use crate::env::ProcessEnvironment;
use crate::error::Result;
use crate::install::{NodeInstaller, Os, DEFAULT_NODE_VERSION, DEFAULT_TARGET_FOLDER};

/// Command queued when none is given on the command line. The
/// reference use is the entrypoint of an n8n container.
pub const DEFAULT_COMMAND: &str = "n8n";

/// nodestrap - Node.js container entrypoint.
#[derive(Debug, Parser)]
#[command(name = "nodestrap")]
#[command(author, version)]
#[command(about = "Container entrypoint that installs a pinned Node.js runtime and runs commands through npx")]
pub struct Cli {
    /// Commands to run through npx, one per argument; a leading "npm"
    /// token is stripped. Defaults to "n8n" when none are given.
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Node.js version to install when the runtime is missing
    #[arg(long, env = "NODE_VERSION", default_value = DEFAULT_NODE_VERSION)]
    pub node_version: String,

    /// Operating system identifier of the distribution to download
    #[arg(long, value_enum, default_value_t = OsArg::host())]
    pub os: OsArg,

    /// Architecture of the distribution to download
    #[arg(long, env = "NODE_ARCH", default_value = "x64")]
    pub arch: String,

    /// Folder the distribution is downloaded and extracted into
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TARGET_FOLDER)]
    pub target_dir: String,

    /// Change the working directory before setup and execution
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// CLI value for the distribution operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OsArg {
    Linux,
    Macos,
}

impl OsArg {
    /// Identifier matching the host this binary was built for.
    pub fn host() -> Self {
        if cfg!(target_os = "macos") {
            OsArg::Macos
        } else {
            OsArg::Linux
        }
    }
}

impl fmt::Display for OsArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsArg::Linux => f.write_str("linux"),
            OsArg::Macos => f.write_str("macos"),
        }
    }
}

impl From<OsArg> for Os {
    fn from(arg: OsArg) -> Self {
        match arg {
            OsArg::Linux => Os::Linux,
            OsArg::Macos => Os::Macos,
        }
    }
}

impl Cli {
    /// Build the orchestrator described by these arguments.
    pub fn into_entrypoint(self) -> Result<Entrypoint> {
        let env = ProcessEnvironment::from_process()?;
        let installer = NodeInstaller::new(self.node_version, self.os.into(), self.arch)
            .with_target_folder(self.target_dir);

        let mut entrypoint = Entrypoint::new(env, installer);
        if let Some(cwd) = self.cwd {
            entrypoint = entrypoint.with_cwd(cwd);
        }

        let commands = if self.commands.is_empty() {
            vec![DEFAULT_COMMAND.to_string()]
        } else {
            self.commands
        };
        for command in commands {
            entrypoint = entrypoint.with_command(command)?;
        }
        Ok(entrypoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pinned_configuration() {
        std::env::remove_var("NODE_VERSION");
        std::env::remove_var("NODE_ARCH");
        let cli = Cli::parse_from(["nodestrap"]);
        assert!(cli.commands.is_empty());
        assert_eq!(cli.node_version, DEFAULT_NODE_VERSION);
        assert_eq!(cli.arch, "x64");
        assert_eq!(cli.target_dir, DEFAULT_TARGET_FOLDER);
        assert_eq!(cli.os, OsArg::host());
        assert!(cli.cwd.is_none());
    }

    #[test]
    fn positional_arguments_become_commands() {
        let cli = Cli::parse_from(["nodestrap", "npm install", "n8n"]);
        assert_eq!(cli.commands, ["npm install", "n8n"]);
    }

    #[test]
    fn os_values_parse() {
        let cli = Cli::parse_from(["nodestrap", "--os", "macos"]);
        assert_eq!(cli.os, OsArg::Macos);
        assert_eq!(Os::from(cli.os), Os::Macos);
    }

    #[test]
    fn unknown_os_value_is_rejected() {
        assert!(Cli::try_parse_from(["nodestrap", "--os", "windows"]).is_err());
    }

    #[test]
    fn into_entrypoint_queues_default_command() {
        let cli = Cli::parse_from(["nodestrap"]);
        let entrypoint = cli.into_entrypoint().unwrap();
        assert_eq!(entrypoint.queued_commands(), [vec![DEFAULT_COMMAND.to_string()]]);
    }

    #[test]
    fn into_entrypoint_normalizes_npm_commands() {
        let cli = Cli::parse_from(["nodestrap", "npm install"]);
        let entrypoint = cli.into_entrypoint().unwrap();
        assert_eq!(entrypoint.queued_commands(), [vec!["install".to_string()]]);
    }

    #[test]
    fn os_arg_display_matches_value_names() {
        assert_eq!(OsArg::Linux.to_string(), "linux");
        assert_eq!(OsArg::Macos.to_string(), "macos");
    }
}
