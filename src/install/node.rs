//! Node.js distribution installation and path conventions.
//!
//! Knows the nodejs.org download URL template and the conventional
//! `{target}/bin/{binary}` layout of an extracted distribution. Binary
//! paths are computed against the context cwd at call time, never
//! stored, so they track a working-directory change.

use std::fmt;
use std::path::PathBuf;

use crate::env::ProcessEnvironment;
use crate::error::Result;
use crate::install::archive::{self, InstallSpec};

/// Pinned Node.js release installed when none is present.
pub const DEFAULT_NODE_VERSION: &str = "v24.11.0";

/// Default folder the distribution is downloaded and extracted into.
pub const DEFAULT_TARGET_FOLDER: &str = "nodejs_download";

/// Operating system identifier used in the distribution file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Macos,
}

impl Os {
    /// Identifier as it appears in the distribution file name.
    pub fn identifier(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Macos => "macos",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Installer for a pinned Node.js distribution.
#[derive(Debug, Clone)]
pub struct NodeInstaller {
    version: String,
    os: Os,
    arch: String,
    target_folder_name: String,
}

impl Default for NodeInstaller {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_VERSION, Os::Linux, "x64")
    }
}

impl NodeInstaller {
    pub fn new(version: impl Into<String>, os: Os, arch: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            os,
            arch: arch.into(),
            target_folder_name: DEFAULT_TARGET_FOLDER.to_string(),
        }
    }

    /// Override the folder the distribution is extracted into.
    pub fn with_target_folder(mut self, name: impl Into<String>) -> Self {
        self.target_folder_name = name.into();
        self
    }

    /// Distribution archive URL for the configured version, OS and
    /// architecture.
    pub fn download_url(&self) -> String {
        format!(
            "https://nodejs.org/dist/{version}/node-{version}-{os}-{arch}.tar.xz",
            version = self.version,
            os = self.os,
            arch = self.arch,
        )
    }

    /// `bin` directory of the extracted distribution under the context
    /// cwd.
    pub fn bin_dir(&self, env: &ProcessEnvironment) -> PathBuf {
        env.cwd().join(&self.target_folder_name).join("bin")
    }

    /// Full path to the `node` executable.
    pub fn node_path(&self, env: &ProcessEnvironment) -> PathBuf {
        self.bin_dir(env).join("node")
    }

    /// Full path to the `npm` executable.
    pub fn npm_path(&self, env: &ProcessEnvironment) -> PathBuf {
        self.bin_dir(env).join("npm")
    }

    /// Full path to the `npx` executable.
    pub fn npx_path(&self, env: &ProcessEnvironment) -> PathBuf {
        self.bin_dir(env).join("npx")
    }

    /// Whether the distribution is present at its conventional paths.
    ///
    /// The distribution counts as installed when both the `node` and
    /// `npm` executables exist. Re-evaluated on every call; there is no
    /// persistent install marker.
    pub fn is_installed(&self, env: &ProcessEnvironment) -> bool {
        self.node_path(env).exists() && self.npm_path(env).exists()
    }

    /// Download and extract the distribution, adding its `bin`
    /// directory to the context search path.
    pub fn install(&self, env: &mut ProcessEnvironment) -> Result<()> {
        archive::install(
            &InstallSpec {
                url: self.download_url(),
                target_folder_name: Some(self.target_folder_name.clone()),
                untar: true,
                untar_file_name: None,
                extra_path_suffixes: vec![format!("{}/bin", self.target_folder_name)],
            },
            env,
        )
    }
}
