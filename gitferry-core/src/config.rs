//! Configuration management for gitferry
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GITFERRY_*)
//! 3. Config file (~/.config/gitferry/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Visibility of repositories created during import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible only to the owner and collaborators
    #[default]
    Private,
    /// Visible to everyone
    Public,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            other => Err(format!(
                "invalid visibility '{}', expected 'private' or 'public'",
                other
            )),
        }
    }
}

/// Defaults applied to import runs
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Visibility for destinations created during import
    pub visibility: Visibility,

    /// Organization to create missing destinations under (personal account if unset)
    pub organization: Option<String>,

    /// Archive each destination after a successful import
    pub archive: bool,
}

/// External tool settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Path to the git executable
    pub git_path: String,

    /// Path to the gh executable
    pub gh_path: String,

    /// Base directory for mirror workspaces (system temp dir if unset)
    pub workspace_dir: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git_path: "git".to_string(),
            gh_path: "gh".to_string(),
            workspace_dir: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Import defaults
    pub import: ImportConfig,
    /// External tool settings
    pub tools: ToolsConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/gitferry/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gitferry").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GITFERRY_VISIBILITY: Visibility for created destinations (private/public)
    /// - GITFERRY_ORG: Organization for created destinations
    /// - GITFERRY_GIT_PATH: Path to the git executable
    /// - GITFERRY_GH_PATH: Path to the gh executable
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(visibility) = std::env::var("GITFERRY_VISIBILITY") {
            match visibility.parse() {
                Ok(v) => self.import.visibility = v,
                Err(e) => tracing::warn!(error = %e, "Ignoring GITFERRY_VISIBILITY"),
            }
        }

        if let Ok(org) = std::env::var("GITFERRY_ORG") {
            self.import.organization = if org.is_empty() { None } else { Some(org) };
        }

        if let Ok(git_path) = std::env::var("GITFERRY_GIT_PATH") {
            self.tools.git_path = git_path;
        }

        if let Ok(gh_path) = std::env::var("GITFERRY_GH_PATH") {
            self.tools.gh_path = gh_path;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        git_path: Option<String>,
        gh_path: Option<String>,
    ) -> Self {
        if let Some(path) = git_path {
            self.tools.git_path = path;
        }

        if let Some(path) = gh_path {
            self.tools.gh_path = path;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(git_path: Option<String>, gh_path: Option<String>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(git_path, gh_path))
    }
}
