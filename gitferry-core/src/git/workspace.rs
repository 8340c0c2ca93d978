//! Mirror workspace creation and removal
//!
//! A mirror workspace is the local directory one bare mirror clone lives in
//! while a pair is being imported. It exists only between the clone and the
//! push, and must be gone afterwards whether or not those steps succeeded.

use std::path::{Path, PathBuf};

use crate::repo_url::RepoUrl;
use crate::{Error, Result};

/// Get the default base directory for mirror workspaces
///
/// Returns `<system temp dir>/gitferry`
pub fn default_workspace_dir() -> PathBuf {
    std::env::temp_dir().join("gitferry")
}

/// Generate the workspace path for a destination repository
///
/// The name is derived from the destination (`owner-repo.git`) so it is
/// unique per pair and stable across runs.
pub fn workspace_path(base: &Path, destination: &RepoUrl) -> PathBuf {
    base.join(destination.mirror_name())
}

/// An ephemeral directory reserved for one bare mirror clone
///
/// `create` only reserves the path (git creates the directory during the
/// mirror clone). `remove` releases it; a `Drop` backstop covers early
/// returns so no workspace outlives the processing of its pair.
#[derive(Debug)]
pub struct MirrorWorkspace {
    path: PathBuf,
    released: bool,
}

impl MirrorWorkspace {
    /// Reserve a workspace for the given destination
    ///
    /// A leftover directory from an interrupted run is removed first so the
    /// mirror clone starts from a clean path.
    pub fn create(base: &Path, destination: &RepoUrl) -> Result<Self> {
        let path = workspace_path(base, destination);

        if path.exists() {
            tracing::warn!(path = %path.display(), "Removing leftover mirror workspace");
            std::fs::remove_dir_all(&path).map_err(|e| {
                Error::Other(format!(
                    "Failed to remove leftover workspace {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }

        std::fs::create_dir_all(base).map_err(|e| {
            Error::Other(format!(
                "Failed to create workspace directory {}: {}",
                base.display(),
                e
            ))
        })?;

        Ok(Self {
            path,
            released: false,
        })
    }

    /// Path the mirror clone is written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace directory
    pub fn remove(mut self) -> Result<()> {
        self.released = true;

        if self.path.exists() {
            std::fs::remove_dir_all(&self.path).map_err(|e| {
                Error::Other(format!(
                    "Failed to remove mirror workspace {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

impl Drop for MirrorWorkspace {
    fn drop(&mut self) {
        if !self.released && self.path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove mirror workspace"
                );
            }
        }
    }
}
