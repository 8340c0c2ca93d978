//! Gitferry Core - Core library for importing Git repositories into GitHub
//!
//! This crate provides manifest parsing, mirror clone/push through the git
//! command line, and the per-pair import orchestration used by the gitferry
//! CLI.

pub mod config;
pub mod error;
pub mod git;
pub mod import;
pub mod manifest;
pub mod repo_url;

pub use config::{Config, ImportConfig, ToolsConfig, Visibility};
pub use error::{Error, Result};
pub use git::{default_workspace_dir, GitCli, MirrorTransport, MirrorWorkspace};
pub use import::{
    import_pair, ControlPlane, ImportOptions, ImportReport, ImportStep, PairOutcome,
};
pub use manifest::{load_manifest, parse_manifest, Manifest, ParseIssue, RepoPair};
pub use repo_url::RepoUrl;
