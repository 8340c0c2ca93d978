//! Git operations for gitferry
//!
//! Mirror clone/push through the git command line and the ephemeral
//! workspaces the mirrors live in.

mod mirror;
mod workspace;

pub use mirror::{GitCli, MirrorTransport};
pub use workspace::{default_workspace_dir, workspace_path, MirrorWorkspace};
