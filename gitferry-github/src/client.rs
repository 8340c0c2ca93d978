//! GitHub control-plane client driving the gh CLI
//!
//! All calls shell out to `gh` with `GH_HOST` set to the destination's host,
//! so GitHub Enterprise destinations work and credentials stay entirely with
//! gh's own auth store.

use async_trait::async_trait;
use gitferry_core::{ControlPlane, RepoUrl, Visibility};
use tokio::process::Command;
use tracing::{debug, info};

use crate::{Error, Result};

/// Client for destination existence checks, creation, and archival
#[derive(Debug, Clone)]
pub struct GhClient {
    gh_path: String,
}

impl GhClient {
    /// Create a client using `gh` from PATH
    pub fn new() -> Self {
        Self {
            gh_path: "gh".to_string(),
        }
    }

    /// Use a custom path to the gh executable
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.gh_path = path.into();
        self
    }

    async fn run(&self, host: &str, args: &[&str]) -> Result<std::process::Output> {
        debug!(host = %host, args = ?args, "Running gh");

        Command::new(&self.gh_path)
            .args(args)
            .env("GH_HOST", host)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Spawn(format!(
                        "gh executable not found at '{}'. Is the GitHub CLI installed?",
                        self.gh_path
                    ))
                } else {
                    Error::Spawn(e.to_string())
                }
            })
    }

    /// Whether the destination repository exists
    pub async fn repo_exists(&self, repo: &RepoUrl) -> Result<bool> {
        let slug = repo.full_name();
        let output = self
            .run(&repo.host, &["repo", "view", &slug, "--json", "name"])
            .await?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let payload: serde_json::Value = serde_json::from_str(stdout.trim())
                .map_err(|e| Error::Output(format!("repo view returned invalid JSON: {}", e)))?;

            if payload.get("name").and_then(|n| n.as_str()).is_none() {
                return Err(Error::Output(format!(
                    "repo view returned no name for {}",
                    slug
                )));
            }

            return Ok(true);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);

        if is_auth_failure(&stderr) {
            return Err(Error::Auth(format!(
                "Not authenticated for {}. Run 'gh auth login --hostname {}'.",
                repo.host, repo.host
            )));
        }

        if view_indicates_missing(&stderr) {
            return Ok(false);
        }

        Err(Error::Command {
            command: "repo view".to_string(),
            repo: slug,
            message: stderr.trim().to_string(),
        })
    }

    /// Create the destination repository
    ///
    /// The namespace is `organization` when given, otherwise the owner from
    /// the destination URL.
    pub async fn create_repo(
        &self,
        repo: &RepoUrl,
        visibility: Visibility,
        organization: Option<&str>,
    ) -> Result<()> {
        let slug = creation_slug(repo, organization);
        let flag = match visibility {
            Visibility::Private => "--private",
            Visibility::Public => "--public",
        };

        info!(repo = %slug, visibility = %visibility, "Creating destination repository");

        let output = self
            .run(&repo.host, &["repo", "create", &slug, flag])
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);

            if is_auth_failure(&stderr) {
                return Err(Error::Auth(format!(
                    "Not authenticated for {}. Run 'gh auth login --hostname {}'.",
                    repo.host, repo.host
                )));
            }

            return Err(Error::Command {
                command: "repo create".to_string(),
                repo: slug,
                message: stderr.trim().to_string(),
            });
        }

        Ok(())
    }

    /// Mark the destination repository as archived
    pub async fn archive_repo(&self, repo: &RepoUrl) -> Result<()> {
        let slug = repo.full_name();

        info!(repo = %slug, "Archiving destination repository");

        let output = self
            .run(&repo.host, &["repo", "archive", &slug, "-y"])
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Command {
                command: "repo archive".to_string(),
                repo: slug,
                message: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}

impl Default for GhClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ControlPlane for GhClient {
    async fn repo_exists(&self, repo: &RepoUrl) -> gitferry_core::Result<bool> {
        GhClient::repo_exists(self, repo).await.map_err(into_core)
    }

    async fn create_repo(
        &self,
        repo: &RepoUrl,
        visibility: Visibility,
        organization: Option<&str>,
    ) -> gitferry_core::Result<()> {
        GhClient::create_repo(self, repo, visibility, organization)
            .await
            .map_err(into_core)
    }

    async fn archive_repo(&self, repo: &RepoUrl) -> gitferry_core::Result<()> {
        GhClient::archive_repo(self, repo).await.map_err(into_core)
    }
}

fn into_core(err: Error) -> gitferry_core::Error {
    gitferry_core::Error::ControlPlane(err.to_string())
}

/// The `owner/repo` slug a missing destination is created under
fn creation_slug(repo: &RepoUrl, organization: Option<&str>) -> String {
    match organization {
        Some(org) => format!("{}/{}", org, repo.repo),
        None => repo.full_name(),
    }
}

fn is_auth_failure(stderr: &str) -> bool {
    stderr.contains("gh auth login")
        || stderr.contains("authentication")
        || stderr.contains("Bad credentials")
}

/// Whether a failed `repo view` means the repository does not exist
///
/// gh exits non-zero for unknown repositories; anything else non-zero is a
/// real control-plane failure.
fn view_indicates_missing(stderr: &str) -> bool {
    stderr.contains("Could not resolve to a Repository")
        || stderr.contains("Not Found")
        || stderr.contains("not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest() -> RepoUrl {
        RepoUrl::parse("https://github.com/org1/repo1.git").unwrap()
    }

    #[test]
    fn test_creation_slug_uses_url_owner_by_default() {
        assert_eq!(creation_slug(&dest(), None), "org1/repo1");
    }

    #[test]
    fn test_creation_slug_prefers_organization() {
        assert_eq!(creation_slug(&dest(), Some("acme")), "acme/repo1");
    }

    #[test]
    fn test_auth_failure_detection() {
        assert!(is_auth_failure(
            "To get started with GitHub CLI, please run:  gh auth login"
        ));
        assert!(is_auth_failure("HTTP 401: Bad credentials"));
        assert!(!is_auth_failure("GraphQL: Could not resolve to a Repository"));
    }

    #[test]
    fn test_missing_repository_detection() {
        assert!(view_indicates_missing(
            "GraphQL: Could not resolve to a Repository with the name 'org1/repo1'."
        ));
        assert!(view_indicates_missing("HTTP 404: Not Found"));
        assert!(!view_indicates_missing("error connecting to api.github.com"));
    }
}
