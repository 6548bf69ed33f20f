//! Download-and-extract installation of archive distributions.
//!
//! The fetch and extract tools (`wget`, `tar`) are external
//! collaborators resolved through the context search path; their
//! absence is a hard failure with no fallback. There is no retry and
//! no checksum verification, and a failed extraction leaves the
//! downloaded archive on disk.

use std::fs;

use crate::env::ProcessEnvironment;
use crate::error::Result;
use crate::shell;

/// One archive installation request.
#[derive(Debug, Clone)]
pub struct InstallSpec {
    /// URL to fetch. The downloaded file is named by the final path
    /// segment.
    pub url: String,

    /// Folder, relative to the context cwd, to extract into. Created
    /// single-level when missing; `None` extracts into the cwd itself.
    pub target_folder_name: Option<String>,

    /// Extract the downloaded file with `tar`, stripping the leading
    /// path component when a target folder is set.
    pub untar: bool,

    /// Archive file name override; defaults to the URL's final segment.
    pub untar_file_name: Option<String>,

    /// Path suffixes, relative to the context cwd, prepended to the
    /// context search path after installation. Later entries end up
    /// with the highest priority.
    pub extra_path_suffixes: Vec<String>,
}

/// Download `spec.url` into the context cwd and optionally extract it.
///
/// Steps run in order and the first subprocess failure aborts the rest:
/// create the target folder, fetch, extract, remove the archive, then
/// prepend the extra path suffixes. The archive is only removed after a
/// successful extraction.
pub fn install(spec: &InstallSpec, env: &mut ProcessEnvironment) -> Result<()> {
    tracing::info!("Installing {}", spec.url);

    if let Some(target) = &spec.target_folder_name {
        let target_dir = env.cwd().join(target);
        if !target_dir.exists() {
            // Single level only: a missing parent is an error.
            fs::create_dir(&target_dir)?;
        }
    }

    shell::execute(&["wget".to_string(), spec.url.clone()], env)?;

    if spec.untar {
        let file_name = spec
            .untar_file_name
            .clone()
            .unwrap_or_else(|| file_name_from_url(&spec.url));
        tracing::info!("Untarring {}", file_name);

        let mut tar_argv: Vec<String> = vec!["tar".into()];
        match &spec.target_folder_name {
            Some(target) => tar_argv.extend([
                "--strip-components".into(),
                "1".into(),
                "-xf".into(),
                file_name.clone(),
                "-C".into(),
                target.clone(),
            ]),
            None => tar_argv.extend(["-xf".into(), file_name.clone()]),
        }
        shell::execute(&tar_argv, env)?;

        fs::remove_file(env.cwd().join(&file_name))?;
    }

    for suffix in &spec.extra_path_suffixes {
        let dir = env.resolve_suffix(suffix);
        tracing::info!("Adding {} to PATH", dir.display());
        env.prepend_path(dir);
    }

    Ok(())
}

fn file_name_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::error::NodestrapError;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    /// Write an executable shell script into `dir`.
    fn write_script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Context whose cwd is `cwd` and whose search path starts with
    /// `tools` (where fake fetch tools live).
    fn env_with_tools(cwd: &Path, tools: &Path) -> ProcessEnvironment {
        let mut env = ProcessEnvironment::from_parts(cwd, Some("/usr/bin:/bin"));
        env.prepend_path(tools);
        env
    }

    /// Build `archive_name` in `dir`: a real tar archive holding
    /// `pkg-1.0/bin/tool`. `tar -xf` detects the format by content, so
    /// the name's extension does not have to match.
    fn build_fixture_archive(dir: &Path, archive_name: &str) {
        let root = dir.join("pkg-1.0");
        fs::create_dir_all(root.join("bin")).unwrap();
        write_script(&root.join("bin"), "tool", "echo tool-ran");
        let status = std::process::Command::new("tar")
            .current_dir(dir)
            .args(["-cf", archive_name, "pkg-1.0"])
            .status()
            .unwrap();
        assert!(status.success());
        fs::remove_dir_all(root).unwrap();
    }

    fn spec(url: &str) -> InstallSpec {
        InstallSpec {
            url: url.to_string(),
            target_folder_name: None,
            untar: false,
            untar_file_name: None,
            extra_path_suffixes: Vec::new(),
        }
    }

    #[test]
    fn install_downloads_named_by_url_segment() {
        let work = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        // Fake wget: create a file named by the URL's final segment.
        write_script(tools.path(), "wget", r#"touch "${1##*/}""#);

        let mut env = env_with_tools(work.path(), tools.path());
        install(&spec("https://example.com/dist/pkg.tar"), &mut env).unwrap();

        assert!(work.path().join("pkg.tar").exists());
    }

    #[test]
    fn install_untar_extracts_and_removes_archive() {
        let work = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        build_fixture_archive(tools.path(), "pkg.tar");
        let fixture = tools.path().join("pkg.tar");
        write_script(
            tools.path(),
            "wget",
            &format!(r#"cp "{}" "${{1##*/}}""#, fixture.display()),
        );

        let mut env = env_with_tools(work.path(), tools.path());
        let mut request = spec("https://example.com/dist/pkg.tar");
        request.target_folder_name = Some("dist".into());
        request.untar = true;
        request.extra_path_suffixes = vec!["dist/bin".into()];
        install(&request, &mut env).unwrap();

        // Leading path component stripped into the target folder.
        assert!(work.path().join("dist/bin/tool").exists());
        // Archive cleaned up after successful extraction.
        assert!(!work.path().join("pkg.tar").exists());
        // Suffix prepended with top priority.
        assert_eq!(env.search_path()[0], work.path().join("dist/bin"));
    }

    #[test]
    fn install_creates_missing_target_folder() {
        let work = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        write_script(tools.path(), "wget", r#"touch "${1##*/}""#);

        let mut env = env_with_tools(work.path(), tools.path());
        let mut request = spec("https://example.com/pkg.tar");
        request.target_folder_name = Some("dist".into());
        install(&request, &mut env).unwrap();

        assert!(work.path().join("dist").is_dir());
    }

    #[test]
    fn install_does_not_create_parent_directories() {
        let work = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        write_script(tools.path(), "wget", r#"touch "${1##*/}""#);

        let mut env = env_with_tools(work.path(), tools.path());
        let mut request = spec("https://example.com/pkg.tar");
        request.target_folder_name = Some("missing/dist".into());
        let err = install(&request, &mut env).unwrap_err();

        assert!(matches!(err, NodestrapError::Io(_)));
    }

    #[test]
    fn failed_fetch_aborts_before_extraction() {
        let work = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        write_script(tools.path(), "wget", "exit 7");

        let mut env = env_with_tools(work.path(), tools.path());
        let mut request = spec("https://example.com/pkg.tar");
        request.untar = true;
        request.extra_path_suffixes = vec!["dist/bin".into()];
        let err = install(&request, &mut env).unwrap_err();

        assert!(matches!(
            err,
            NodestrapError::CommandFailed { code: Some(7), .. }
        ));
        // Aborted before the path suffixes were applied.
        assert!(!env.contains_path(&work.path().join("dist/bin")));
    }

    #[test]
    fn failed_extraction_leaves_archive_on_disk() {
        let work = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        // Fake wget produces a file tar cannot read.
        write_script(tools.path(), "wget", r#"echo garbage > "${1##*/}""#);

        let mut env = env_with_tools(work.path(), tools.path());
        let mut request = spec("https://example.com/pkg.tar");
        request.target_folder_name = Some("dist".into());
        request.untar = true;
        let err = install(&request, &mut env).unwrap_err();

        assert!(matches!(err, NodestrapError::CommandFailed { .. }));
        assert!(work.path().join("pkg.tar").exists());
    }

    #[test]
    fn untar_file_name_overrides_url_segment() {
        let work = TempDir::new().unwrap();
        let tools = TempDir::new().unwrap();
        build_fixture_archive(tools.path(), "renamed.tar");
        let fixture = tools.path().join("renamed.tar");
        // Fake wget writes the override name, not the URL segment.
        write_script(
            tools.path(),
            "wget",
            &format!(r#"cp "{}" renamed.tar"#, fixture.display()),
        );

        let mut env = env_with_tools(work.path(), tools.path());
        let mut request = spec("https://example.com/dist/pkg.tar");
        request.target_folder_name = Some("dist".into());
        request.untar = true;
        request.untar_file_name = Some("renamed.tar".into());
        install(&request, &mut env).unwrap();

        assert!(work.path().join("dist/bin/tool").exists());
        assert!(!work.path().join("renamed.tar").exists());
    }

    #[test]
    fn file_name_from_url_takes_final_segment() {
        assert_eq!(
            file_name_from_url("https://nodejs.org/dist/v1/node-v1.tar.xz"),
            "node-v1.tar.xz"
        );
        assert_eq!(file_name_from_url("plain-name"), "plain-name");
    }
}
