//! nodestrap CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use console::style;
use nodestrap::cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `--quiet` flag raises the threshold to WARN
/// 3. `RUST_LOG` environment variable (if set)
/// 4. Default is INFO
fn init_tracing(debug: bool, quiet: bool) {
    let filter = if debug {
        EnvFilter::new("nodestrap=debug")
    } else if quiet {
        EnvFilter::new("nodestrap=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nodestrap=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.quiet);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    tracing::debug!("nodestrap starting with args: {:?}", cli);

    match cli.into_entrypoint().and_then(|mut entrypoint| entrypoint.run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::from(1)
        }
    }
}
