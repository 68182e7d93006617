//! Loading of changelog and metadata files
//!
//! A relative path is looked up in three places: as given, under the current
//! working directory, and under the installation root of the tool.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Base directories tried when a relative path does not exist as given
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoots {
    /// Current working directory
    pub cwd: PathBuf,
    /// Directory the tool is installed in
    pub install_root: PathBuf,
}

impl SearchRoots {
    /// Roots of the running process
    ///
    /// The install root is the executable's directory, or its parent when
    /// that directory is a `bin/` folder.
    #[must_use]
    pub fn from_env() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let install_root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(install_root_of))
            .unwrap_or_else(|| cwd.clone());

        Self { cwd, install_root }
    }
}

fn install_root_of(exe_dir: &Path) -> PathBuf {
    match (exe_dir.file_name(), exe_dir.parent()) {
        (Some(name), Some(parent)) if name == "bin" => parent.to_path_buf(),
        _ => exe_dir.to_path_buf(),
    }
}

/// Resolve `path` to the first existing candidate location
///
/// Candidates, in order: `path` itself, `cwd/path`, `install_root/path`.
/// Returns `None` when none of them exists.
#[must_use]
pub fn resolve_path(path: &Path, cwd: &Path, install_root: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }
    if path.is_absolute() {
        return None;
    }

    [cwd.join(path), install_root.join(path)]
        .into_iter()
        .find(|candidate| candidate.exists())
}

/// Read the whole file at `path` as UTF-8 text
///
/// # Errors
///
/// - [`CliError::FileNotFound`] if no candidate location exists
/// - [`CliError::FileUnreadable`] if the resolved file cannot be read
pub fn read_to_string(path: &Path, roots: &SearchRoots) -> Result<String> {
    let resolved = resolve_path(path, &roots.cwd, &roots.install_root).ok_or_else(|| {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    })?;
    tracing::debug!("reading {} (resolved from {})", resolved.display(), path.display());

    fs::read_to_string(&resolved).map_err(|e| CliError::FileUnreadable {
        path: resolved,
        reason: e.to_string(),
    })
}
