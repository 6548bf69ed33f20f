//! nodestrap - container entrypoint for Node.js applications.
//!
//! nodestrap bootstraps a container process: it installs a pinned
//! Node.js distribution when none is present, puts its `bin` directory
//! on the search path, and then runs a queue of commands through the
//! distribution's package-runner (`npx`). The reference use is the
//! entrypoint of an n8n container.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`entrypoint`] - Command queue, normalization, and orchestration
//! - [`env`] - Process environment context (cwd and search path)
//! - [`error`] - Error types and result aliases
//! - [`install`] - Archive download/extract and Node.js conventions
//! - [`shell`] - Subprocess execution and the configured binary runner
//!
//! # Example
//!
//! ```
//! use nodestrap::entrypoint::normalize_for_runner;
//!
//! // Commands written npm-style run through npx instead
//! let argv = vec!["npm".to_string(), "install".to_string()];
//! assert_eq!(normalize_for_runner(argv), vec!["install".to_string()]);
//! ```

pub mod cli;
pub mod entrypoint;
pub mod env;
pub mod error;
pub mod install;
pub mod shell;

pub use error::{NodestrapError, Result};
