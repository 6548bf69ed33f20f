//! Process environment context: working directory and search path.
//!
//! The entrypoint has two pieces of process-wide mutable state, the
//! working directory and the `PATH` search path. Both are modeled here
//! as an owned [`ProcessEnvironment`] value that is threaded through
//! the installer and the orchestrator instead of mutating the real
//! process environment. Spawned subprocesses receive the context's
//! cwd and PATH; the parent's variables are never rewritten.
//!
//! PATH containment uses exact entry comparison, never substring
//! matching: `/usr/bin` being present must not make `/usr/bi` count
//! as present.

use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{NodestrapError, Result};

/// Search-path entries seeded when the process starts without a usable
/// `PATH`, or with one that lacks the standard system directories.
const FALLBACK_PATH: &[&str] = &["/usr/local/bin", "/usr/bin", "/bin", "/usr/sbin", "/sbin"];

/// Working directory and search path handed to every spawned subprocess.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    cwd: PathBuf,
    search_path: Vec<PathBuf>,
}

impl ProcessEnvironment {
    /// Capture the context from the real process environment.
    pub fn from_process() -> Result<Self> {
        let cwd = env::current_dir().context("current working directory is unavailable")?;
        let path_var = env::var("PATH").ok();
        Ok(Self::from_parts(cwd, path_var.as_deref()))
    }

    /// Build a context from an explicit working directory and a raw
    /// `PATH` value.
    ///
    /// A missing or blank PATH is replaced with the standard system
    /// directories; a PATH without `/bin` among its entries gains them,
    /// highest priority first.
    pub fn from_parts(cwd: impl Into<PathBuf>, path_var: Option<&str>) -> Self {
        let mut search_path: Vec<PathBuf> = match path_var {
            Some(raw) if !raw.trim().is_empty() => env::split_paths(raw).collect(),
            _ => FALLBACK_PATH.iter().map(PathBuf::from).collect(),
        };

        if !search_path.iter().any(|entry| entry == Path::new("/bin")) {
            let mut seeded: Vec<PathBuf> = FALLBACK_PATH.iter().map(PathBuf::from).collect();
            seeded.append(&mut search_path);
            search_path = seeded;
        }

        Self {
            cwd: cwd.into(),
            search_path,
        }
    }

    /// Current working directory of the context.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Change the context working directory.
    ///
    /// Relative paths resolve against the current context cwd. The
    /// target must exist; there is no restoration on failure later on.
    pub fn set_cwd(&mut self, dir: impl Into<PathBuf>) -> Result<()> {
        let dir = dir.into();
        let dir = if dir.is_absolute() {
            dir
        } else {
            self.cwd.join(dir)
        };
        if !dir.is_dir() {
            return Err(NodestrapError::CwdNotFound { path: dir });
        }
        self.cwd = dir;
        Ok(())
    }

    /// Absolute form of a path suffix relative to the context cwd.
    ///
    /// A leading separator is stripped first, so `/dist/bin` and
    /// `dist/bin` resolve identically.
    pub fn resolve_suffix(&self, suffix: &str) -> PathBuf {
        self.cwd.join(suffix.trim_start_matches('/'))
    }

    /// Whether `dir` is already a search-path entry. Exact comparison.
    pub fn contains_path(&self, dir: &Path) -> bool {
        self.search_path.iter().any(|entry| entry == dir)
    }

    /// Prepend `dir` to the search path, giving it priority over every
    /// existing entry.
    pub fn prepend_path(&mut self, dir: impl Into<PathBuf>) {
        self.search_path.insert(0, dir.into());
    }

    /// Prepend `dir` only when it is not already an entry. Returns
    /// whether the path was added.
    pub fn prepend_path_if_absent(&mut self, dir: impl Into<PathBuf>) -> bool {
        let dir = dir.into();
        if self.contains_path(&dir) {
            return false;
        }
        self.prepend_path(dir);
        true
    }

    /// Search-path entries, highest priority first.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// The search path joined into a `PATH` value for child processes.
    pub fn path_value(&self) -> String {
        self.search_path
            .iter()
            .map(|entry| entry.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(":")
    }
}
