//! Mirror clone and push through the git command line

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// Transport that moves one repository's full history between remotes
///
/// Both operations replicate all refs (branches and tags).
#[async_trait]
pub trait MirrorTransport: Send + Sync {
    /// Mirror-clone `source_url` into `workspace`
    async fn clone_mirror(&self, source_url: &str, workspace: &Path) -> Result<()>;

    /// Push all refs from the mirror in `workspace` to `destination_url`
    async fn push_mirror(&self, workspace: &Path, destination_url: &str) -> Result<()>;
}

/// `MirrorTransport` backed by the git executable
///
/// Credentials are whatever git itself resolves for the remote; gitferry
/// never handles them.
#[derive(Debug, Clone)]
pub struct GitCli {
    git_path: String,
}

impl GitCli {
    /// Create a transport using `git` from PATH
    pub fn new() -> Self {
        Self {
            git_path: "git".to_string(),
        }
    }

    /// Use a custom path to the git executable
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.git_path = path.into();
        self
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MirrorTransport for GitCli {
    async fn clone_mirror(&self, source_url: &str, workspace: &Path) -> Result<()> {
        debug!(source = %source_url, workspace = %workspace.display(), "Running git clone --mirror");

        let output = Command::new(&self.git_path)
            .arg("clone")
            .arg("--mirror")
            .arg(source_url)
            .arg(workspace)
            .output()
            .await
            .map_err(|e| spawn_error(&self.git_path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure("clone --mirror", source_url, &stderr));
        }

        Ok(())
    }

    async fn push_mirror(&self, workspace: &Path, destination_url: &str) -> Result<()> {
        debug!(destination = %destination_url, workspace = %workspace.display(), "Running git push --mirror");

        let output = Command::new(&self.git_path)
            .arg("push")
            .arg("--mirror")
            .arg(destination_url)
            .current_dir(workspace)
            .output()
            .await
            .map_err(|e| spawn_error(&self.git_path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure("push --mirror", destination_url, &stderr));
        }

        Ok(())
    }
}

fn spawn_error(git_path: &str, err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::Git(format!(
            "Git executable not found at '{}'. Is git installed?",
            git_path
        ))
    } else {
        Error::Io(err)
    }
}

/// Map git's stderr to an actionable error message
fn classify_failure(action: &str, url: &str, stderr: &str) -> Error {
    if stderr.contains("Authentication failed") || stderr.contains("Permission denied") {
        return Error::Git(format!(
            "Authentication failed for {}. Check your credentials or repository access.",
            url
        ));
    }

    if stderr.contains("Could not resolve host") || stderr.contains("unable to access") {
        return Error::Git(format!(
            "Network error reaching {}. Check your internet connection.",
            url
        ));
    }

    if stderr.contains("not found") || stderr.contains("does not exist") {
        return Error::Git(format!(
            "Repository not found: {}. Check the URL is correct.",
            url
        ));
    }

    Error::Git(format!(
        "git {} failed for {}: {}",
        action,
        url,
        stderr.trim()
    ))
}
