//! Error types for nodestrap operations.
//!
//! This module defines [`NodestrapError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Subprocess failures collapse into `CommandFailed` regardless of the
//!   underlying cause (missing binary, permission error, tool failure)
//! - No layer recovers locally; errors bubble to `main`, which prints
//!   them and exits non-zero
//! - Use `anyhow::Error` (via `NodestrapError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nodestrap operations.
#[derive(Debug, Error)]
pub enum NodestrapError {
    /// A subprocess exited non-zero or could not be spawned.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A binary runner was used before being bound to an executable.
    #[error("Binary runner '{runner}' was run before configure()")]
    RunnerNotConfigured { runner: String },

    /// A queued command could not be tokenized or was empty.
    #[error("Invalid command '{input}': {message}")]
    InvalidCommand { input: String, message: String },

    /// The working-directory override points at a missing directory.
    #[error("Working directory not found: {path}")]
    CwdNotFound { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for nodestrap operations.
pub type Result<T> = std::result::Result<T, NodestrapError>;
