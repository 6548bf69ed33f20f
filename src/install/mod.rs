//! Runtime distribution installation.
//!
//! [`archive`] downloads and extracts arbitrary archive distributions;
//! [`node`] specializes it for the Node.js distribution layout.

pub mod archive;
pub mod node;

pub use archive::{install, InstallSpec};
pub use node::{NodeInstaller, Os, DEFAULT_NODE_VERSION, DEFAULT_TARGET_FOLDER};
