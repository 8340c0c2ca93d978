//! Gitferry GitHub - GitHub control plane for gitferry
//!
//! This crate drives the `gh` CLI for destination existence checks,
//! creation, and archival. Auth and session state live entirely in gh.

mod client;
mod error;

pub use client::GhClient;
pub use error::{Error, Result};
