//! Destination repository URL parsing

use crate::{Error, Result};

/// Parsed destination repository information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    /// Host the repository lives on (e.g., "github.com")
    pub host: String,
    /// Repository owner or organization
    pub owner: String,
    /// Repository name, without the `.git` suffix
    pub repo: String,
}

impl RepoUrl {
    /// Parse a repository URL
    ///
    /// Supports:
    /// - `https://github.com/owner/repo` (with or without `.git`)
    /// - `ssh://git@github.com/owner/repo.git`
    /// - `git@github.com:owner/repo.git` (SCP style)
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        // Handle https:// and ssh:// URLs
        if input.contains("://") {
            let url = url::Url::parse(input)
                .map_err(|e| Error::Url(format!("{}: {}", input, e)))?;

            match url.scheme() {
                "http" | "https" | "ssh" | "git" => {}
                other => {
                    return Err(Error::Url(format!(
                        "{}: unsupported scheme '{}'",
                        input, other
                    )));
                }
            }

            let host = url
                .host_str()
                .ok_or_else(|| Error::Url(format!("{}: missing host", input)))?
                .to_string();

            let path = url.path().trim_start_matches('/').trim_end_matches(".git");
            let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

            if parts.len() >= 2 {
                return Ok(Self {
                    host,
                    owner: parts[0].to_string(),
                    repo: parts[1].to_string(),
                });
            }

            return Err(Error::Url(format!(
                "{}: expected a path of the form /owner/repo",
                input
            )));
        }

        // Handle SCP-style URLs (e.g., git@github.com:owner/repo.git)
        if let Some((user_host, path)) = input.split_once(':') {
            if let Some((_, host)) = user_host.split_once('@') {
                let path = path.trim_end_matches(".git");
                let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

                if parts.len() >= 2 && !host.is_empty() {
                    return Ok(Self {
                        host: host.to_string(),
                        owner: parts[0].to_string(),
                        repo: parts[1].to_string(),
                    });
                }
            }
        }

        Err(Error::Url(format!(
            "{}. Expected https://host/owner/repo, ssh://host/owner/repo, or user@host:owner/repo.git",
            input
        )))
    }

    /// The `owner/repo` slug used by the hosting control plane
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Directory name for this repository's mirror workspace (owner-repo.git)
    pub fn mirror_name(&self) -> String {
        format!("{}-{}.git", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.repo)
    }
}
